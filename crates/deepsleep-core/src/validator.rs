//! Timer and parameter validation.
//!
//! Requests are checked here before the controller touches the platform.

use crate::config::DeepSleepConfig;
use crate::error::ValidationError;
use crate::reason::WakeupReason;
use crate::request::{MAX_DEEP_SLEEP_TIMEOUT_SECS, SleepRequest};

/// Bounds-checks sleep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRequestValidator {
    max_timeout_seconds: u32,
}

impl SleepRequestValidator {
    /// Create a validator from a configuration.
    ///
    /// A configured limit above the contract maximum is clamped to it.
    #[must_use]
    pub fn new(config: &DeepSleepConfig) -> Self {
        Self {
            max_timeout_seconds: config.max_timeout_seconds.min(MAX_DEEP_SLEEP_TIMEOUT_SECS),
        }
    }

    /// Largest timeout accepted by this validator.
    #[must_use]
    pub fn max_timeout_seconds(&self) -> u32 {
        self.max_timeout_seconds
    }

    /// Validate a sleep timeout.
    ///
    /// Zero is always valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeoutOutOfRange`] above the maximum.
    pub fn validate_timeout(&self, timeout_seconds: u32) -> Result<(), ValidationError> {
        if timeout_seconds > self.max_timeout_seconds {
            return Err(ValidationError::TimeoutOutOfRange {
                value: timeout_seconds,
                max: self.max_timeout_seconds,
            });
        }
        Ok(())
    }

    /// Validate a full sleep request.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is out of range.
    pub fn validate(&self, request: &SleepRequest) -> Result<(), ValidationError> {
        self.validate_timeout(request.timeout_seconds)
    }
}

impl Default for SleepRequestValidator {
    fn default() -> Self {
        Self::new(&DeepSleepConfig::default())
    }
}

/// Check whether `reason` is plausible for a sleep entered with `request`.
///
/// A LAN or WLAN wakeup without network standby points at a platform
/// inconsistency. It is reported, never rejected.
#[must_use]
pub fn check_network_consistency(request: &SleepRequest, reason: WakeupReason) -> bool {
    request.network_standby || !reason.is_network()
}
