//! Wakeup cause resolution.
//!
//! A platform reports a [`WakeEvent`] when a suspend ends. The
//! [`WakeupResolver`] turns it into a [`WakeupOutcome`] that stays stable
//! until the next sleep cycle.

use serde::{Deserialize, Serialize};

use crate::reason::WakeupReason;
use crate::request::SleepRequest;
use crate::validator::check_network_consistency;

/// Raw wake information reported by a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WakeEvent {
    /// Reason as classified by the platform, if it could tell.
    pub reason: Option<WakeupReason>,
    /// A GPIO line triggered the wake.
    pub gpio_triggered: bool,
    /// Key code from the wake source, if any.
    pub key_code: Option<u32>,
    /// The sleep timer expired.
    pub timer_expired: bool,
}

impl WakeEvent {
    /// Wake caused by timer expiry.
    #[must_use]
    pub fn timer() -> Self {
        Self {
            timer_expired: true,
            ..Self::default()
        }
    }

    /// Wake with a platform-classified reason.
    #[must_use]
    pub fn from_reason(reason: WakeupReason) -> Self {
        Self {
            reason: Some(reason),
            gpio_triggered: reason == WakeupReason::Gpio,
            ..Self::default()
        }
    }

    /// Attach a key code.
    #[must_use]
    pub fn with_key_code(mut self, key_code: u32) -> Self {
        self.key_code = Some(key_code);
        self
    }

    /// Set the GPIO trigger flag.
    #[must_use]
    pub fn with_gpio(mut self, gpio_triggered: bool) -> Self {
        self.gpio_triggered = gpio_triggered;
        self
    }
}

/// Classified result of one sleep cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WakeupOutcome {
    /// Why the device woke.
    pub reason: WakeupReason,
    /// A GPIO line triggered the wake.
    pub gpio_triggered: bool,
    /// Key code reported with the wake, if any.
    pub key_code: Option<u32>,
}

impl WakeupOutcome {
    /// Classify a wake event.
    ///
    /// Precedence: platform reason, then timer expiry, then the GPIO flag.
    /// Anything else is [`WakeupReason::Unknown`].
    #[must_use]
    pub fn classify(event: &WakeEvent) -> Self {
        let reason = event
            .reason
            .or_else(|| event.timer_expired.then_some(WakeupReason::Timer))
            .or_else(|| event.gpio_triggered.then_some(WakeupReason::Gpio))
            .unwrap_or_default();

        Self {
            reason,
            gpio_triggered: event.gpio_triggered,
            key_code: event.key_code,
        }
    }
}

/// Holds the last wake outcome for the current session.
#[derive(Debug, Clone, Default)]
pub struct WakeupResolver {
    last: WakeupOutcome,
    report_inconsistencies: bool,
}

impl WakeupResolver {
    /// Create a resolver.
    ///
    /// `report_inconsistencies` controls whether implausible network
    /// wakeups are logged.
    #[must_use]
    pub fn new(report_inconsistencies: bool) -> Self {
        Self {
            report_inconsistencies,
            ..Self::default()
        }
    }

    /// Resolve the cause of the sleep that `request` started.
    ///
    /// Overwrites the previous outcome. Returns `false` in the second
    /// position when the reason is implausible for the request.
    pub fn resolve(&mut self, request: &SleepRequest, event: &WakeEvent) -> (WakeupOutcome, bool) {
        let outcome = WakeupOutcome::classify(event);
        let consistent = check_network_consistency(request, outcome.reason);

        if !consistent && self.report_inconsistencies {
            tracing::warn!(
                reason = %outcome.reason,
                network_standby = request.network_standby,
                "Network wakeup reported while network standby was disabled"
            );
        }

        self.last = outcome;
        (outcome, consistent)
    }

    /// The last resolved outcome.
    #[must_use]
    pub fn outcome(&self) -> WakeupOutcome {
        self.last
    }

    /// The last wakeup reason.
    #[must_use]
    pub fn reason(&self) -> WakeupReason {
        self.last.reason
    }

    /// The last wakeup key code, 0 when none was reported.
    ///
    /// The code is not interpreted; only remote-control reasons give it meaning.
    #[must_use]
    pub fn key_code(&self) -> u32 {
        self.last.key_code.unwrap_or(0)
    }
}
