//! Counters for deep-sleep diagnostics.

use serde::{Deserialize, Serialize};

/// Deep-sleep metrics for monitoring and diagnostics.
///
/// All counters saturate instead of wrapping. The metrics survive
/// `Terminate`/`Init` so a long-running service keeps its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SleepMetrics {
    /// Successful `Init` calls.
    pub init_count: u64,
    /// Requests rejected by validation.
    pub rejected_requests: u64,
    /// Sleeps that reached the platform.
    pub sleep_attempts: u64,
    /// Sleeps that ended with a wake.
    pub completed_sleeps: u64,
    /// Sleeps the platform failed to enter.
    pub failed_sleeps: u64,
    /// Wake finalizations performed by the platform.
    pub wake_finalizations: u64,
    /// `Wakeup` calls that had nothing to finalize.
    pub redundant_wakeups: u64,
    /// Network wakeups seen while network standby was disabled.
    pub unexpected_network_wakes: u64,
    /// Duration of the last completed sleep in milliseconds.
    pub last_sleep_ms: u64,
    /// Total time spent asleep in milliseconds.
    pub total_sleep_ms: u64,
}

impl SleepMetrics {
    /// Create a new metrics instance with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful `Init`.
    pub fn record_init(&mut self) {
        self.init_count = self.init_count.saturating_add(1);
    }

    /// Record a request rejected by validation.
    pub fn record_rejected(&mut self) {
        self.rejected_requests = self.rejected_requests.saturating_add(1);
    }

    /// Record a sleep handed to the platform.
    pub fn record_attempt(&mut self) {
        self.sleep_attempts = self.sleep_attempts.saturating_add(1);
    }

    /// Record a completed sleep and its duration.
    pub fn record_completed(&mut self, slept_ms: u64, consistent: bool) {
        self.completed_sleeps = self.completed_sleeps.saturating_add(1);
        self.last_sleep_ms = slept_ms;
        self.total_sleep_ms = self.total_sleep_ms.saturating_add(slept_ms);
        if !consistent {
            self.unexpected_network_wakes = self.unexpected_network_wakes.saturating_add(1);
        }
    }

    /// Record a sleep the platform failed to enter.
    pub fn record_failed(&mut self) {
        self.failed_sleeps = self.failed_sleeps.saturating_add(1);
    }

    /// Record a wake finalization.
    pub fn record_finalization(&mut self) {
        self.wake_finalizations = self.wake_finalizations.saturating_add(1);
    }

    /// Record a `Wakeup` with nothing to finalize.
    pub fn record_redundant_wakeup(&mut self) {
        self.redundant_wakeups = self.redundant_wakeups.saturating_add(1);
    }

    /// Fraction of platform sleep attempts that completed (0.0 to 1.0).
    #[expect(clippy::cast_precision_loss, reason = "ratio of diagnostic counters")]
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.sleep_attempts == 0 {
            1.0
        } else {
            self.completed_sleeps as f64 / self.sleep_attempts as f64
        }
    }
}
