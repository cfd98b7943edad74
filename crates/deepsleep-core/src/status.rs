//! Closed result taxonomy returned from every deep-sleep operation.
//!
//! Every failure inside the crate is funnelled into one of these codes by
//! [`crate::error::DeepSleepError::status`]. Platform error values never cross
//! this boundary.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Status code returned by every deep-sleep operation.
///
/// The numeric codes are stable and may be used on the wire.
///
/// # Examples
///
/// ```
/// use deepsleep_core::StatusCode;
///
/// assert_eq!(StatusCode::SetFailure.code(), 5);
/// assert_eq!(StatusCode::from_code(3), Some(StatusCode::NotInitialized));
/// assert!(StatusCode::Success.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum StatusCode {
    /// Operation completed.
    #[default]
    Success = 0,
    /// A parameter was outside its allowed range.
    InvalidArgument = 1,
    /// `Init` was called on an already initialized module.
    AlreadyInitialized = 2,
    /// The module is not in a state that allows the operation.
    NotInitialized = 3,
    /// Platform setup failed during `Init`.
    InitFailure = 4,
    /// The platform could not enter deep sleep.
    SetFailure = 5,
    /// Wake-side finalization failed.
    WakeupFailure = 6,
    /// Cleanup failed during `Terminate`.
    TermFailure = 7,
}

impl StatusCode {
    /// Every status code, in code order.
    pub const ALL: [Self; 8] = [
        Self::Success,
        Self::InvalidArgument,
        Self::AlreadyInitialized,
        Self::NotInitialized,
        Self::InitFailure,
        Self::SetFailure,
        Self::WakeupFailure,
        Self::TermFailure,
    ];

    /// Get the numeric code.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert from a numeric code.
    ///
    /// Returns `None` for codes outside the taxonomy.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidArgument),
            2 => Some(Self::AlreadyInitialized),
            3 => Some(Self::NotInitialized),
            4 => Some(Self::InitFailure),
            5 => Some(Self::SetFailure),
            6 => Some(Self::WakeupFailure),
            7 => Some(Self::TermFailure),
            _ => None,
        }
    }

    /// Check whether this is [`StatusCode::Success`].
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Get the canonical name of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::InitFailure => "INIT_FAILURE",
            Self::SetFailure => "SET_FAILURE",
            Self::WakeupFailure => "WAKEUP_FAILURE",
            Self::TermFailure => "TERM_FAILURE",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
