//! Hardware-free platform for tests and host tools.
//!
//! `SimulatedPlatform` blocks inside `suspend()` the way real hardware does,
//! but the wake source is a [`WakeTrigger`] that any thread can fire.

use core::time::Duration;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

use crate::error::{PlatformError, PlatformResult};
use crate::platform::DeepSleepPlatform;
use crate::reason::WakeupReason;
use crate::request::SleepRequest;
use crate::resolver::WakeEvent;

const WAKE_QUEUE_DEPTH: usize = 16;

/// Handle that delivers external wake events to a [`SimulatedPlatform`].
///
/// Cloneable and `Send`, so a wake can be fired from another thread while
/// the controller is blocked in `EnterDeepSleep`.
#[derive(Debug, Clone)]
pub struct WakeTrigger {
    tx: Sender<WakeEvent>,
}

impl WakeTrigger {
    /// Deliver a wake event.
    ///
    /// Events delivered while the device is awake stay latched and end the
    /// next sleep immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform was dropped or too many wake events
    /// are already pending.
    pub fn wake(&self, event: WakeEvent) -> PlatformResult<()> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => PlatformError::unavailable("wake queue full"),
            TrySendError::Disconnected(_) => PlatformError::unavailable("platform dropped"),
        })
    }

    /// Deliver a wake event with a platform-classified reason.
    ///
    /// # Errors
    ///
    /// See [`WakeTrigger::wake`].
    pub fn wake_with(&self, reason: WakeupReason) -> PlatformResult<()> {
        self.wake(WakeEvent::from_reason(reason))
    }
}

/// Which platform hooks should fail, shared with the platform.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFaults {
    plan: Arc<Mutex<FaultPlan>>,
}

#[derive(Debug, Default)]
struct FaultPlan {
    init: Option<PlatformError>,
    suspend: Option<PlatformError>,
    finalize_wake: Option<PlatformError>,
    terminate: Option<PlatformError>,
}

impl SimulatedFaults {
    /// Make `init()` fail until cleared.
    pub fn fail_init(&self, err: PlatformError) {
        self.plan.lock().init = Some(err);
    }

    /// Make `suspend()` fail until cleared.
    pub fn fail_suspend(&self, err: PlatformError) {
        self.plan.lock().suspend = Some(err);
    }

    /// Make `finalize_wake()` fail until cleared.
    pub fn fail_finalize_wake(&self, err: PlatformError) {
        self.plan.lock().finalize_wake = Some(err);
    }

    /// Make `terminate()` fail until cleared.
    pub fn fail_terminate(&self, err: PlatformError) {
        self.plan.lock().terminate = Some(err);
    }

    /// Remove every injected fault.
    pub fn clear(&self) {
        *self.plan.lock() = FaultPlan::default();
    }

    fn check(&self, pick: impl FnOnce(&FaultPlan) -> &Option<PlatformError>) -> PlatformResult<()> {
        match pick(&self.plan.lock()) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Count of each platform hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulatedCalls {
    /// `init()` calls.
    pub init: u32,
    /// `suspend()` calls.
    pub suspend: u32,
    /// `finalize_wake()` calls.
    pub finalize_wake: u32,
    /// `terminate()` calls.
    pub terminate: u32,
}

/// Software deep-sleep platform.
///
/// # Example
///
/// ```rust
/// use deepsleep_core::prelude::*;
/// use std::time::Duration;
///
/// let (platform, _trigger) = SimulatedPlatform::new();
/// let platform = platform.with_second_length(Duration::from_millis(1));
/// let mut manager = DeepSleepManager::new(platform);
///
/// manager.init()?;
/// let gpio = manager.enter_deep_sleep(SleepRequest::new(5, false))?;
/// manager.wakeup()?;
///
/// assert!(!gpio);
/// assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Timer);
/// manager.terminate()?;
/// # Ok::<(), DeepSleepError>(())
/// ```
#[derive(Debug)]
pub struct SimulatedPlatform {
    wake_rx: Receiver<WakeEvent>,
    second_length: Duration,
    faults: SimulatedFaults,
    calls: SimulatedCalls,
    last_request: Option<SleepRequest>,
}

impl SimulatedPlatform {
    /// Create a platform and the trigger that wakes it.
    ///
    /// Once every trigger clone is dropped, a sleep without a timer fails
    /// instead of blocking forever.
    #[must_use]
    pub fn new() -> (Self, WakeTrigger) {
        let (tx, rx) = crossbeam::channel::bounded(WAKE_QUEUE_DEPTH);
        let platform = Self {
            wake_rx: rx,
            second_length: Duration::from_secs(1),
            faults: SimulatedFaults::default(),
            calls: SimulatedCalls::default(),
            last_request: None,
        };
        (platform, WakeTrigger { tx })
    }

    /// Set how long one timer second lasts.
    #[must_use]
    pub fn with_second_length(mut self, second_length: Duration) -> Self {
        self.second_length = second_length;
        self
    }

    /// Handle for injecting faults.
    #[must_use]
    pub fn faults(&self) -> SimulatedFaults {
        self.faults.clone()
    }

    /// Hook invocation counts.
    #[must_use]
    pub fn calls(&self) -> SimulatedCalls {
        self.calls
    }

    /// The request passed to the most recent `suspend()`.
    #[must_use]
    pub fn last_request(&self) -> Option<SleepRequest> {
        self.last_request
    }

    fn timer_length(&self, request: &SleepRequest) -> Option<Duration> {
        request
            .has_timer()
            .then(|| self.second_length.saturating_mul(request.timeout_seconds))
    }
}

impl DeepSleepPlatform for SimulatedPlatform {
    fn name(&self) -> &str {
        "simulated"
    }

    fn init(&mut self) -> PlatformResult<()> {
        self.calls.init = self.calls.init.saturating_add(1);
        self.faults.check(|plan| &plan.init)?;
        // Wake events from a previous session do not carry over.
        while self.wake_rx.try_recv().is_ok() {}
        Ok(())
    }

    fn suspend(&mut self, request: &SleepRequest) -> PlatformResult<WakeEvent> {
        self.calls.suspend = self.calls.suspend.saturating_add(1);
        self.last_request = Some(*request);
        self.faults.check(|plan| &plan.suspend)?;

        let Some(length) = self.timer_length(request) else {
            return self.wake_rx.recv().map_err(|e| {
                PlatformError::interrupted(format!("untimed sleep without wake source: {e}"))
            });
        };

        let Some(deadline) = Instant::now().checked_add(length) else {
            // Deadline beyond what the clock can hold: the timer never fires first.
            return Ok(self.wake_rx.recv().unwrap_or_else(|_| WakeEvent::timer()));
        };

        match self.wake_rx.recv_deadline(deadline) {
            Ok(event) => Ok(event),
            Err(RecvTimeoutError::Timeout) => Ok(WakeEvent::timer()),
            Err(RecvTimeoutError::Disconnected) => {
                // Only the timer is left to end this sleep.
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                Ok(WakeEvent::timer())
            }
        }
    }

    fn finalize_wake(&mut self) -> PlatformResult<()> {
        self.calls.finalize_wake = self.calls.finalize_wake.saturating_add(1);
        self.faults.check(|plan| &plan.finalize_wake)
    }

    fn terminate(&mut self) -> PlatformResult<()> {
        self.calls.terminate = self.calls.terminate.saturating_add(1);
        self.faults.check(|plan| &plan.terminate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn fast_platform() -> (SimulatedPlatform, WakeTrigger) {
        let (platform, trigger) = SimulatedPlatform::new();
        (platform.with_second_length(Duration::from_millis(1)), trigger)
    }

    #[test]
    fn test_timer_expiry() -> TestResult {
        let (mut platform, _trigger) = fast_platform();
        platform.init()?;
        let event = platform.suspend(&SleepRequest::new(3, false))?;
        assert!(event.timer_expired);
        assert_eq!(platform.calls().suspend, 1);
        Ok(())
    }

    #[test]
    fn test_untimed_sleep_waits_for_trigger() -> TestResult {
        let (mut platform, trigger) = fast_platform();
        platform.init()?;

        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            trigger.wake(WakeEvent::from_reason(WakeupReason::Ir).with_key_code(0x1F))
        });

        let event = platform.suspend(&SleepRequest::indefinite(true))?;
        assert_eq!(event.reason, Some(WakeupReason::Ir));
        assert_eq!(event.key_code, Some(0x1F));
        assert!(!event.timer_expired);

        let Ok(sent) = waker.join() else {
            return Err("waker thread panicked".into());
        };
        sent?;
        Ok(())
    }

    #[test]
    fn test_untimed_sleep_without_triggers_is_interrupted() {
        let (mut platform, trigger) = fast_platform();
        drop(trigger);
        let result = platform.suspend(&SleepRequest::indefinite(false));
        assert!(matches!(result, Err(PlatformError::Interrupted(_))));
    }

    #[test]
    fn test_timed_sleep_survives_dropped_triggers() -> TestResult {
        let (mut platform, trigger) = fast_platform();
        drop(trigger);
        let event = platform.suspend(&SleepRequest::new(2, false))?;
        assert!(event.timer_expired);
        Ok(())
    }

    #[test]
    fn test_fault_injection() {
        let (mut platform, _trigger) = fast_platform();
        let faults = platform.faults();
        faults.fail_init(PlatformError::hardware(-5, "pmic"));
        assert!(platform.init().is_err());

        faults.clear();
        assert!(platform.init().is_ok());
        assert_eq!(platform.calls().init, 2);
    }

    #[test]
    fn test_init_discards_stale_wake_events() -> TestResult {
        let (mut platform, trigger) = fast_platform();
        trigger.wake_with(WakeupReason::Cec)?;
        platform.init()?;

        let event = platform.suspend(&SleepRequest::new(1, false))?;
        assert!(event.timer_expired);
        Ok(())
    }

    #[test]
    fn test_unschedulable_timer_is_still_a_timed_sleep() -> TestResult {
        let (platform, trigger) = SimulatedPlatform::new();
        let mut platform = platform.with_second_length(Duration::MAX);
        platform.init()?;

        trigger.wake_with(WakeupReason::Cec)?;
        let event = platform.suspend(&SleepRequest::new(5, false))?;
        assert_eq!(event.reason, Some(WakeupReason::Cec));

        drop(trigger);
        let event = platform.suspend(&SleepRequest::new(5, false))?;
        assert!(event.timer_expired);
        Ok(())
    }
}
