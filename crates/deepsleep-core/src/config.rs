//! Configuration for the deep-sleep controller.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::request::MAX_DEEP_SLEEP_TIMEOUT_SECS;

/// Deep-sleep controller configuration.
///
/// Missing fields take their default values when deserializing.
///
/// # Examples
///
/// ```
/// use deepsleep_core::DeepSleepConfig;
///
/// let config = DeepSleepConfig::from_json_str(r#"{ "max_timeout_seconds": 3600 }"#)?;
/// assert_eq!(config.max_timeout_seconds, 3600);
/// assert!(config.report_unexpected_network_wake);
/// # Ok::<(), deepsleep_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepSleepConfig {
    /// Largest timeout the platform accepts, at most one week.
    pub max_timeout_seconds: u32,
    /// Log LAN/WLAN wakeups observed while network standby was disabled.
    pub report_unexpected_network_wake: bool,
}

impl Default for DeepSleepConfig {
    fn default() -> Self {
        Self {
            max_timeout_seconds: MAX_DEEP_SLEEP_TIMEOUT_SECS,
            report_unexpected_network_wake: true,
        }
    }
}

impl DeepSleepConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> DeepSleepConfigBuilder {
        DeepSleepConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_timeout_seconds` exceeds the contract maximum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_timeout_seconds > MAX_DEEP_SLEEP_TIMEOUT_SECS {
            return Err(ValidationError::invalid_configuration(format!(
                "max_timeout_seconds must not exceed {MAX_DEEP_SLEEP_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::invalid_configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `DeepSleepConfig`.
#[derive(Debug, Default)]
pub struct DeepSleepConfigBuilder {
    config: DeepSleepConfig,
}

impl DeepSleepConfigBuilder {
    /// Set the largest accepted timeout in seconds.
    #[must_use]
    pub fn max_timeout_seconds(mut self, seconds: u32) -> Self {
        self.config.max_timeout_seconds = seconds;
        self
    }

    /// Enable or disable reporting of unexpected network wakeups.
    #[must_use]
    pub fn report_unexpected_network_wake(mut self, enabled: bool) -> Self {
        self.config.report_unexpected_network_wake = enabled;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<DeepSleepConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
