//! Wakeup reason listing

use anyhow::Result;

use crate::output;

/// List every wakeup reason.
pub fn execute(json: bool) -> Result<()> {
    output::print_reasons(json)
}
