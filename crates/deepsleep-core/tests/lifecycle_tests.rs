//! Lifecycle controller tests against the simulated platform.

use core::time::Duration;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use deepsleep_core::prelude::*;
use parking_lot::Mutex;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Log sink shared with a test subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fast_manager() -> (DeepSleepManager<SimulatedPlatform>, WakeTrigger) {
    let (platform, trigger) = SimulatedPlatform::new();
    let platform = platform.with_second_length(Duration::from_millis(1));
    (DeepSleepManager::new(platform), trigger)
}

#[test]
fn test_every_operation_requires_init() {
    let (mut manager, _trigger) = fast_manager();

    assert_eq!(
        manager.enter_deep_sleep(SleepRequest::new(10, false)).status(),
        StatusCode::NotInitialized
    );
    assert_eq!(manager.wakeup().status(), StatusCode::NotInitialized);
    assert_eq!(manager.last_wakeup_reason().status(), StatusCode::NotInitialized);
    assert_eq!(manager.last_wakeup_key_code().status(), StatusCode::NotInitialized);
    assert_eq!(manager.set_deep_sleep_timer(10).status(), StatusCode::NotInitialized);
    assert_eq!(manager.terminate().status(), StatusCode::NotInitialized);
    assert_eq!(manager.platform().calls().suspend, 0);
}

#[test]
fn test_every_operation_rejected_after_terminate() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager.terminate()?;

    assert_eq!(manager.state(), LifecycleState::Terminated);
    assert_eq!(
        manager.enter_deep_sleep(SleepRequest::new(10, false)).status(),
        StatusCode::NotInitialized
    );
    assert_eq!(manager.wakeup().status(), StatusCode::NotInitialized);
    assert_eq!(manager.last_wakeup_reason().status(), StatusCode::NotInitialized);
    assert_eq!(manager.terminate().status(), StatusCode::NotInitialized);
    assert_eq!(manager.platform().calls().terminate, 1);
    Ok(())
}

#[test]
fn test_double_init_keeps_session() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager.enter_deep_sleep(SleepRequest::new(1, false))?;

    assert_eq!(manager.init().status(), StatusCode::AlreadyInitialized);
    assert_eq!(manager.state(), LifecycleState::Ready);
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Timer);
    assert_eq!(manager.platform().calls().init, 1);
    Ok(())
}

#[test]
fn test_timeout_bounds() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;

    let result = manager.enter_deep_sleep(SleepRequest::new(MAX_DEEP_SLEEP_TIMEOUT_SECS + 1, false));
    assert_eq!(result.status(), StatusCode::InvalidArgument);
    assert_eq!(manager.state(), LifecycleState::Ready);
    assert_eq!(manager.platform().calls().suspend, 0);
    assert_eq!(manager.metrics().rejected_requests, 1);

    let result = manager.enter_deep_sleep(SleepRequest::new(u32::MAX, true));
    assert_eq!(result.status(), StatusCode::InvalidArgument);

    let zero_length = SimulatedPlatform::new().0.with_second_length(Duration::ZERO);
    let mut week = DeepSleepManager::new(zero_length);
    week.init()?;
    week.enter_deep_sleep(SleepRequest::new(MAX_DEEP_SLEEP_TIMEOUT_SECS, false))?;
    assert_eq!(week.last_wakeup_reason()?, WakeupReason::Timer);
    Ok(())
}

#[test]
fn test_untimed_sleep_blocks_until_external_wake() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    manager.init()?;

    let delay = Duration::from_millis(50);
    let waker = thread::spawn(move || {
        thread::sleep(delay);
        trigger.wake(WakeEvent::from_reason(WakeupReason::Lan))
    });

    let started = Instant::now();
    let gpio = manager.enter_deep_sleep(SleepRequest::indefinite(true))?;
    assert!(started.elapsed() >= delay);
    assert!(!gpio);

    let Ok(sent) = waker.join() else {
        return Err("waker thread panicked".into());
    };
    sent?;

    manager.wakeup()?;
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Lan);
    assert_eq!(manager.metrics().unexpected_network_wakes, 0);
    Ok(())
}

#[test]
fn test_reason_is_stable_across_queries() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager.enter_deep_sleep(SleepRequest::new(2, false))?;
    manager.wakeup()?;

    for _ in 0..5 {
        assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Timer);
        assert_eq!(manager.last_wakeup_key_code()?, 0);
    }
    Ok(())
}

#[test]
fn test_gpio_wake_reports_flag() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    manager.init()?;
    trigger.wake_with(WakeupReason::Gpio)?;

    let gpio = manager.enter_deep_sleep(SleepRequest::indefinite(false))?;
    assert!(gpio);
    manager.wakeup()?;
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Gpio);
    Ok(())
}

#[test]
fn test_remote_key_code_is_reported() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    manager.init()?;
    trigger.wake(WakeEvent::from_reason(WakeupReason::RcuRf4ce).with_key_code(0xE00C))?;

    manager.enter_deep_sleep(SleepRequest::new(600, false))?;
    manager.wakeup()?;
    let reason = manager.last_wakeup_reason()?;
    assert!(reason.is_remote_control());
    assert_eq!(manager.last_wakeup_key_code()?, 0xE00C);
    Ok(())
}

#[test]
fn test_wakeup_without_sleep_is_noop() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;

    manager.wakeup()?;
    manager.wakeup()?;
    assert_eq!(manager.state(), LifecycleState::Ready);
    assert_eq!(manager.platform().calls().finalize_wake, 0);
    assert_eq!(manager.metrics().redundant_wakeups, 2);
    Ok(())
}

#[test]
fn test_wakeup_failure_is_retried() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager.enter_deep_sleep(SleepRequest::new(1, false))?;

    let faults = manager.platform().faults();
    faults.fail_finalize_wake(PlatformError::hardware(-2, "resume hook"));
    assert_eq!(manager.wakeup().status(), StatusCode::WakeupFailure);
    assert_eq!(manager.state(), LifecycleState::Ready);

    faults.clear();
    manager.wakeup()?;
    assert_eq!(manager.platform().calls().finalize_wake, 2);
    assert_eq!(manager.metrics().wake_finalizations, 1);
    Ok(())
}

#[test]
fn test_reinit_resets_reason() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    manager.init()?;
    trigger.wake(WakeEvent::from_reason(WakeupReason::Ir).with_key_code(7))?;
    manager.enter_deep_sleep(SleepRequest::indefinite(false))?;
    manager.wakeup()?;
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Ir);

    manager.terminate()?;
    manager.init()?;
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Unknown);
    assert_eq!(manager.last_wakeup_key_code()?, 0);
    assert_eq!(manager.deep_sleep_status(), DeepSleepStatus::NotStarted);
    assert_eq!(manager.deep_sleep_timer(), None);
    assert_eq!(manager.metrics().init_count, 2);
    Ok(())
}

#[test]
fn test_terminate_failure_still_terminates() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager
        .platform()
        .faults()
        .fail_terminate(PlatformError::cleanup("wake gpio still claimed"));

    let result = manager.terminate();
    assert_eq!(result.status(), StatusCode::TermFailure);
    assert_eq!(manager.state(), LifecycleState::Terminated);
    assert_eq!(manager.wakeup().status(), StatusCode::NotInitialized);

    manager.platform().faults().clear();
    manager.init()?;
    assert_eq!(manager.state(), LifecycleState::Ready);
    Ok(())
}

#[test]
fn test_untimed_sleep_without_wake_source_fails() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    manager.init()?;
    drop(trigger);

    let result = manager.enter_deep_sleep(SleepRequest::indefinite(false));
    assert_eq!(result.status(), StatusCode::SetFailure);
    assert_eq!(manager.state(), LifecycleState::Ready);
    assert_eq!(manager.deep_sleep_status(), DeepSleepStatus::Failed);
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Unknown);

    // Nothing was resumed, so there is nothing to finalize.
    manager.wakeup()?;
    assert_eq!(manager.platform().calls().finalize_wake, 0);
    Ok(())
}

#[test]
fn test_unexpected_network_wake_is_counted_not_rejected() -> TestResult {
    let (mut manager, trigger) = fast_manager();
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || -> TestResult {
        manager.init()?;
        trigger.wake_with(WakeupReason::Wlan)?;
        manager.enter_deep_sleep(SleepRequest::new(30, false))?;
        manager.wakeup()?;
        Ok(())
    })?;

    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Wlan);
    assert_eq!(manager.metrics().unexpected_network_wakes, 1);

    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(
        output.contains("Network wakeup reported while network standby was disabled"),
        "{output}"
    );
    Ok(())
}

#[test]
fn test_init_failure_after_terminate_stays_terminated() -> TestResult {
    let (mut manager, _trigger) = fast_manager();
    manager.init()?;
    manager.terminate()?;

    let faults = manager.platform().faults();
    faults.fail_init(PlatformError::unavailable("pm driver"));
    assert_eq!(manager.init().status(), StatusCode::InitFailure);
    assert_eq!(manager.state(), LifecycleState::Terminated);
    assert_eq!(manager.last_wakeup_reason().status(), StatusCode::NotInitialized);

    faults.clear();
    manager.init()?;
    assert_eq!(manager.state(), LifecycleState::Ready);
    Ok(())
}

#[test]
fn test_unschedulable_timer_does_not_become_untimed() -> TestResult {
    let (platform, trigger) = SimulatedPlatform::new();
    let mut manager = DeepSleepManager::new(platform.with_second_length(Duration::MAX));
    manager.init()?;
    drop(trigger);

    manager.enter_deep_sleep(SleepRequest::new(5, false))?;
    manager.wakeup()?;
    assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Timer);
    Ok(())
}

#[test]
fn test_config_limits_timeout() -> TestResult {
    let config = DeepSleepConfig::builder().max_timeout_seconds(60).build()?;
    let (platform, _trigger) = SimulatedPlatform::new();
    let mut manager = DeepSleepManager::with_config(platform, config)?;
    manager.init()?;

    assert_eq!(manager.set_deep_sleep_timer(61).status(), StatusCode::InvalidArgument);
    assert_eq!(manager.set_deep_sleep_timer(60).status(), StatusCode::Success);
    Ok(())
}
