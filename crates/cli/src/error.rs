//! Error types for deepsleepctl

use std::path::PathBuf;

use deepsleep_core::{DeepSleepError, StatusCode, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Contract(#[from] DeepSleepError),

    #[error("Configuration rejected")]
    InvalidConfiguration(#[from] ValidationError),

    #[error("Cannot read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Contract status behind this error, if it came from the controller.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Contract(e) => Some(e.status()),
            _ => None,
        }
    }

    /// Process exit code: `10 + status` for contract failures, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        self.status().map_or(1, |status| 10 + status.code())
    }
}
