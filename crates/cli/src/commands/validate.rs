//! Timeout validation command

use anyhow::Result;
use deepsleep_core::{DeepSleepConfig, DeepSleepError, Operation, SleepRequestValidator};

use crate::commands::ValidateArgs;
use crate::error::CliError;
use crate::output;

/// Check a timeout against the configured bounds.
pub fn execute(args: &ValidateArgs, config: &DeepSleepConfig, json: bool) -> Result<()> {
    let validator = SleepRequestValidator::new(config);
    validator
        .validate_timeout(args.timeout)
        .map_err(|e| CliError::from(DeepSleepError::invalid_argument(Operation::EnterDeepSleep, e)))?;

    output::print_validation(args.timeout, validator.max_timeout_seconds(), json)
}
