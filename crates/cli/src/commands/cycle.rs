//! Full deep-sleep cycle against the simulated platform

use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use deepsleep_core::prelude::*;
use serde::Serialize;

use crate::commands::CycleArgs;
use crate::error::CliError;
use crate::output;

/// Result of one Init → Terminate cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub request: SleepRequest,
    pub gpio_triggered: bool,
    pub reason: WakeupReason,
    pub key_code: u32,
    pub slept_ms: u64,
    pub success_rate: f64,
    pub metrics: SleepMetrics,
}

/// Execute a cycle
pub fn execute(args: &CycleArgs, config: DeepSleepConfig, json: bool) -> Result<()> {
    let (platform, trigger) = SimulatedPlatform::new();
    let platform = platform.with_second_length(Duration::from_millis(args.second_ms));
    let mut manager = DeepSleepManager::with_config(platform, config).map_err(CliError::from)?;
    manager.on_transition(|from, to| tracing::debug!(%from, %to, "State changed"));

    let request = SleepRequest::new(args.timeout, args.network_standby);
    let waker = match wake_event(args) {
        Some(event) => Some(PendingWake {
            event,
            delay: Duration::from_millis(args.wake_after_ms),
            trigger,
        }),
        None => {
            // No wake source: an untimed sleep fails instead of blocking forever.
            drop(trigger);
            None
        }
    };

    let (gpio_triggered, reason, key_code) =
        run_cycle(&mut manager, request, waker).map_err(CliError::from)?;
    let metrics = manager.metrics();
    let report = CycleReport {
        request,
        gpio_triggered,
        reason,
        key_code,
        slept_ms: metrics.last_sleep_ms,
        success_rate: metrics.success_rate(),
        metrics,
    };
    output::print_cycle(&report, json)
}

/// Wake event requested on the command line, if any.
fn wake_event(args: &CycleArgs) -> Option<WakeEvent> {
    if args.wake.is_none() && !args.gpio {
        return None;
    }

    let mut event = args.wake.map_or_else(WakeEvent::default, WakeEvent::from_reason);
    if args.gpio {
        event = event.with_gpio(true);
    }
    if let Some(key_code) = args.key_code {
        event = event.with_key_code(key_code);
    }
    Some(event)
}

/// A wake event waiting to be fired during the sleep.
struct PendingWake {
    event: WakeEvent,
    delay: Duration,
    trigger: WakeTrigger,
}

impl PendingWake {
    /// Fire the wake event from a helper thread.
    fn spawn(self) -> JoinHandle<PlatformResult<()>> {
        let Self {
            event,
            delay,
            trigger,
        } = self;
        thread::spawn(move || {
            thread::sleep(delay);
            tracing::info!(reason = ?event.reason, "Firing wake source");
            trigger.wake(event)
        })
    }
}

/// Run Init, the sleep and its queries, then Terminate.
///
/// The wake source is armed only once `Init` succeeded, since `Init`
/// discards wake events latched before it.
fn run_cycle(
    manager: &mut DeepSleepManager<SimulatedPlatform>,
    request: SleepRequest,
    waker: Option<PendingWake>,
) -> DeepSleepResult<(bool, WakeupReason, u32)> {
    manager.init()?;
    let handle = waker.map(PendingWake::spawn);

    let cycle = sleep_and_query(manager, request);
    let terminated = manager.terminate();

    if let Some(handle) = handle {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Wake event was not delivered"),
            Err(_) => tracing::warn!("Wake thread panicked"),
        }
    }

    let outcome = cycle?;
    terminated?;
    Ok(outcome)
}

fn sleep_and_query(
    manager: &mut DeepSleepManager<SimulatedPlatform>,
    request: SleepRequest,
) -> DeepSleepResult<(bool, WakeupReason, u32)> {
    let gpio_triggered = manager.enter_deep_sleep(request)?;
    manager.wakeup()?;
    let reason = manager.last_wakeup_reason()?;
    let key_code = manager.last_wakeup_key_code()?;
    Ok((gpio_triggered, reason, key_code))
}
