//! Error types and the mapping into [`StatusCode`].
//!
//! Three layers of error exist:
//!
//! - [`PlatformError`]: what a [`crate::platform::DeepSleepPlatform`] reports.
//! - [`ValidationError`]: parameter and configuration rejections.
//! - [`DeepSleepError`]: what callers of the controller see. Each variant
//!   maps onto exactly one [`StatusCode`].
//!
//! Platform errors only enter the contract through
//! [`DeepSleepError::from_platform`], which picks the status from the
//! operation that failed rather than from the platform's own classification.

use core::fmt;

use thiserror::Error;

use crate::lifecycle::LifecycleState;
use crate::status::StatusCode;

/// Errors reported by a platform implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The platform facility is not available.
    #[error("platform unavailable: {0}")]
    Unavailable(String),

    /// A hardware routine returned an error code.
    #[error("hardware error {code}: {message}")]
    Hardware {
        /// Raw platform code.
        code: i32,
        /// Human readable context.
        message: String,
    },

    /// A blocking platform call was interrupted before completing.
    #[error("interrupted: {0}")]
    Interrupted(String),

    /// Resources could not be released.
    #[error("cleanup failed: {0}")]
    Cleanup(String),
}

impl PlatformError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a hardware error.
    #[must_use]
    pub fn hardware(code: i32, msg: impl Into<String>) -> Self {
        Self::Hardware {
            code,
            message: msg.into(),
        }
    }

    /// Create an interrupted error.
    #[must_use]
    pub fn interrupted(msg: impl Into<String>) -> Self {
        Self::Interrupted(msg.into())
    }

    /// Create a cleanup error.
    #[must_use]
    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::Cleanup(msg.into())
    }
}

/// A specialized `Result` type for platform hooks.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Parameter and configuration rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Sleep timeout above the permitted maximum.
    #[error("timeout {value}s out of range [0, {max}]")]
    TimeoutOutOfRange {
        /// Requested timeout in seconds.
        value: u32,
        /// Maximum accepted timeout in seconds.
        max: u32,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ValidationError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Contract operations, used to attribute errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `Init`.
    Init,
    /// `EnterDeepSleep`.
    EnterDeepSleep,
    /// `Wakeup`.
    Wakeup,
    /// `GetLastWakeupReason`.
    GetLastWakeupReason,
    /// `GetLastWakeupKeyCode`.
    GetLastWakeupKeyCode,
    /// `SetDeepSleepTimer`.
    SetDeepSleepTimer,
    /// `Terminate`.
    Terminate,
}

impl Operation {
    /// Every contract operation.
    pub const ALL: [Self; 7] = [
        Self::Init,
        Self::EnterDeepSleep,
        Self::Wakeup,
        Self::GetLastWakeupReason,
        Self::GetLastWakeupKeyCode,
        Self::SetDeepSleepTimer,
        Self::Terminate,
    ];

    /// Get the operation name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::EnterDeepSleep => "EnterDeepSleep",
            Self::Wakeup => "Wakeup",
            Self::GetLastWakeupReason => "GetLastWakeupReason",
            Self::GetLastWakeupKeyCode => "GetLastWakeupKeyCode",
            Self::SetDeepSleepTimer => "SetDeepSleepTimer",
            Self::Terminate => "Terminate",
        }
    }

    /// Status reported when the platform fails during this operation.
    #[must_use]
    pub fn platform_failure_status(self) -> StatusCode {
        match self {
            Self::Init => StatusCode::InitFailure,
            Self::EnterDeepSleep | Self::SetDeepSleepTimer => StatusCode::SetFailure,
            Self::Wakeup | Self::GetLastWakeupReason | Self::GetLastWakeupKeyCode => {
                StatusCode::WakeupFailure
            }
            Self::Terminate => StatusCode::TermFailure,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`crate::lifecycle::DeepSleepManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepSleepError {
    /// Parameter rejected before reaching the platform.
    #[error("{operation}: {source}")]
    InvalidArgument {
        /// Operation that rejected the argument.
        operation: Operation,
        /// Validation failure.
        #[source]
        source: ValidationError,
    },

    /// `Init` called while already initialized.
    #[error("Init: module already initialized")]
    AlreadyInitialized,

    /// Operation issued before `Init` or after `Terminate`.
    #[error("{0}: module not initialized")]
    NotInitialized(Operation),

    /// Operation issued from a lifecycle state that does not allow it.
    #[error("{operation}: not allowed while {state}")]
    InvalidState {
        /// Rejected operation.
        operation: Operation,
        /// State at the time of the call.
        state: LifecycleState,
    },

    /// Platform setup failed.
    #[error("Init: {0}")]
    InitFailure(#[source] PlatformError),

    /// The platform could not enter deep sleep.
    #[error("{operation}: {source}")]
    SetFailure {
        /// Operation that attempted to configure or enter sleep.
        operation: Operation,
        /// Platform failure.
        #[source]
        source: PlatformError,
    },

    /// Wake-side finalization failed.
    #[error("Wakeup: {0}")]
    WakeupFailure(#[source] PlatformError),

    /// Cleanup failed; the module is terminated regardless.
    #[error("Terminate: {0}")]
    TermFailure(#[source] PlatformError),
}

impl DeepSleepError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(operation: Operation, source: ValidationError) -> Self {
        Self::InvalidArgument { operation, source }
    }

    /// Create an invalid state error.
    #[must_use]
    pub fn invalid_state(operation: Operation, state: LifecycleState) -> Self {
        Self::InvalidState { operation, state }
    }

    /// Map a platform failure into the contract taxonomy.
    #[must_use]
    pub fn from_platform(operation: Operation, source: PlatformError) -> Self {
        match operation {
            Operation::Init => Self::InitFailure(source),
            Operation::EnterDeepSleep | Operation::SetDeepSleepTimer => {
                Self::SetFailure { operation, source }
            }
            Operation::Wakeup
            | Operation::GetLastWakeupReason
            | Operation::GetLastWakeupKeyCode => Self::WakeupFailure(source),
            Operation::Terminate => Self::TermFailure(source),
        }
    }

    /// Get the status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::InvalidArgument,
            Self::AlreadyInitialized => StatusCode::AlreadyInitialized,
            Self::NotInitialized(_) | Self::InvalidState { .. } => StatusCode::NotInitialized,
            Self::InitFailure(_) => StatusCode::InitFailure,
            Self::SetFailure { .. } => StatusCode::SetFailure,
            Self::WakeupFailure(_) => StatusCode::WakeupFailure,
            Self::TermFailure(_) => StatusCode::TermFailure,
        }
    }
}

/// A specialized `Result` type for deep-sleep operations.
pub type DeepSleepResult<T> = std::result::Result<T, DeepSleepError>;

/// Collapse a result into the closed status taxonomy.
pub trait StatusExt {
    /// [`StatusCode::Success`] for `Ok`, the mapped code for `Err`.
    fn status(&self) -> StatusCode;
}

impl<T> StatusExt for DeepSleepResult<T> {
    fn status(&self) -> StatusCode {
        match self {
            Ok(_) => StatusCode::Success,
            Err(e) => e.status(),
        }
    }
}
