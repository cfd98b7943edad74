//! Sleep request parameters.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest sleep timeout accepted by the contract (one week).
pub const MAX_DEEP_SLEEP_TIMEOUT_SECS: u32 = 604_800;

/// Parameters for a single `EnterDeepSleep` call.
///
/// A `timeout_seconds` of zero is a sentinel: no automatic timer is armed
/// and the device stays asleep until an external wake source fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SleepRequest {
    /// Seconds until the wake timer fires, or 0 for no timer.
    pub timeout_seconds: u32,
    /// Keep the network interface able to wake the device.
    pub network_standby: bool,
}

impl SleepRequest {
    /// Create a request with a wake timer.
    #[must_use]
    pub fn new(timeout_seconds: u32, network_standby: bool) -> Self {
        Self {
            timeout_seconds,
            network_standby,
        }
    }

    /// Create a request that only an external wake source can end.
    #[must_use]
    pub fn indefinite(network_standby: bool) -> Self {
        Self::new(0, network_standby)
    }

    /// Check whether an automatic wake timer is requested.
    #[must_use]
    pub fn has_timer(&self) -> bool {
        self.timeout_seconds != 0
    }

    /// The wake timer as a duration, `None` for the no-timer sentinel.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.has_timer()
            .then(|| Duration::from_secs(u64::from(self.timeout_seconds)))
    }
}
