//! Lifecycle controller for the deep-sleep module.
//!
//! `DeepSleepManager` owns the module state and gates every operation
//! behind it. The state is an explicit value owned by the manager, so
//! independent instances can coexist (one per test, for example).
//!
//! # State Machine
//!
//! ```text
//! Uninitialized ──init()──► Ready ──enter_deep_sleep()──► Sleeping
//!       ▲                   ▲  │                            │
//!       │                   │  └──────── (device wakes) ◄───┘
//!   init() fail             │
//!                      wakeup()
//!                           │
//! Ready / Sleeping ──terminate()──► Terminated ──init()──► Ready
//! ```
//!
//! # Threading
//!
//! The manager is `Send` but not `Sync`: exactly one owner issues calls.
//! Callers that need to share it must serialize access themselves, for
//! example behind a mutex or inside a single-threaded actor.

use core::fmt;
use core::marker::PhantomData;
use std::cell::Cell;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::DeepSleepConfig;
use crate::error::{DeepSleepError, DeepSleepResult, Operation, ValidationError};
use crate::metrics::SleepMetrics;
use crate::platform::DeepSleepPlatform;
use crate::reason::WakeupReason;
use crate::request::SleepRequest;
use crate::resolver::{WakeupOutcome, WakeupResolver};
use crate::validator::SleepRequestValidator;

/// Observable lifecycle stage of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// `Init` has never succeeded.
    Uninitialized,
    /// Initialized and awake.
    Ready,
    /// Blocked inside `EnterDeepSleep`.
    Sleeping,
    /// `Terminate` ran; only `Init` is accepted.
    Terminated,
}

impl LifecycleState {
    /// Check whether the module accepts operations other than `Init`.
    #[must_use]
    pub fn is_initialized(self) -> bool {
        matches!(self, Self::Ready | Self::Sleeping)
    }

    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Ready => "Ready",
            Self::Sleeping => "Sleeping",
            Self::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the most recent deep-sleep attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum DeepSleepStatus {
    /// The platform failed to enter deep sleep.
    Failed = -1,
    /// No sleep attempted in this session.
    #[default]
    NotStarted = 0,
    /// A sleep is in progress.
    InProgress = 1,
    /// The last sleep ended with a wake.
    Completed = 2,
}

impl DeepSleepStatus {
    /// Get the numeric code.
    #[must_use]
    pub fn code(self) -> i8 {
        self as i8
    }
}

/// Callback invoked on every lifecycle transition with `(from, to)`.
pub type TransitionCallback = Box<dyn Fn(LifecycleState, LifecycleState) + Send>;

/// Per-session data, created by `Init` and dropped by `Terminate`.
#[derive(Debug)]
struct Session {
    resolver: WakeupResolver,
    pending_finalize: bool,
    sleep_status: DeepSleepStatus,
    timer_seconds: Option<u32>,
}

impl Session {
    fn new(config: &DeepSleepConfig) -> Self {
        Self {
            resolver: WakeupResolver::new(config.report_unexpected_network_wake),
            pending_finalize: false,
            sleep_status: DeepSleepStatus::NotStarted,
            timer_seconds: None,
        }
    }
}

/// Module state tagged by lifecycle stage.
#[derive(Debug)]
enum ModuleState {
    Uninitialized,
    Ready(Session),
    Sleeping {
        session: Session,
        request: SleepRequest,
        since: Instant,
    },
    Terminated,
}

impl ModuleState {
    fn lifecycle(&self) -> LifecycleState {
        match self {
            Self::Uninitialized => LifecycleState::Uninitialized,
            Self::Ready(_) => LifecycleState::Ready,
            Self::Sleeping { .. } => LifecycleState::Sleeping,
            Self::Terminated => LifecycleState::Terminated,
        }
    }

    fn session(&self) -> Option<&Session> {
        match self {
            Self::Ready(session) | Self::Sleeping { session, .. } => Some(session),
            Self::Uninitialized | Self::Terminated => None,
        }
    }
}

/// Deep-sleep lifecycle controller.
///
/// Every operation returns a [`DeepSleepResult`]; use
/// [`crate::error::StatusExt::status`] or [`DeepSleepError::status`] to
/// obtain the contract [`crate::StatusCode`].
///
/// # Example
///
/// ```rust
/// use deepsleep_core::prelude::*;
///
/// let (platform, trigger) = SimulatedPlatform::new();
/// let mut manager = DeepSleepManager::new(platform);
/// manager.init()?;
///
/// // A latched wake event ends the next untimed sleep.
/// trigger.wake(WakeEvent::from_reason(WakeupReason::RcuBt).with_key_code(0x74)).ok();
/// manager.enter_deep_sleep(SleepRequest::indefinite(false))?;
/// manager.wakeup()?;
///
/// assert_eq!(manager.last_wakeup_reason()?, WakeupReason::RcuBt);
/// assert_eq!(manager.last_wakeup_key_code()?, 0x74);
/// # Ok::<(), DeepSleepError>(())
/// ```
pub struct DeepSleepManager<P: DeepSleepPlatform> {
    platform: P,
    config: DeepSleepConfig,
    validator: SleepRequestValidator,
    state: ModuleState,
    metrics: SleepMetrics,
    transition_callbacks: Vec<TransitionCallback>,
    _single_owner: PhantomData<Cell<()>>,
}

impl<P: DeepSleepPlatform> fmt::Debug for DeepSleepManager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSleepManager")
            .field("platform", &self.platform.name())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("metrics", &self.metrics)
            .field("transition_callbacks", &self.transition_callbacks.len())
            .finish()
    }
}

impl<P: DeepSleepPlatform> DeepSleepManager<P> {
    /// Create a manager with the default configuration.
    #[must_use]
    pub fn new(platform: P) -> Self {
        let config = DeepSleepConfig::default();
        Self {
            platform,
            validator: SleepRequestValidator::new(&config),
            config,
            state: ModuleState::Uninitialized,
            metrics: SleepMetrics::new(),
            transition_callbacks: Vec::new(),
            _single_owner: PhantomData,
        }
    }

    /// Create a manager with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(platform: P, config: DeepSleepConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let mut manager = Self::new(platform);
        manager.validator = SleepRequestValidator::new(&config);
        manager.config = config;
        Ok(manager)
    }

    /// Register a callback for lifecycle transitions.
    pub fn on_transition(
        &mut self,
        callback: impl Fn(LifecycleState, LifecycleState) + Send + 'static,
    ) {
        self.transition_callbacks.push(Box::new(callback));
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state.lifecycle()
    }

    /// Progress of the most recent sleep attempt in this session.
    #[must_use]
    pub fn deep_sleep_status(&self) -> DeepSleepStatus {
        self.state
            .session()
            .map_or(DeepSleepStatus::NotStarted, |s| s.sleep_status)
    }

    /// The full outcome of the last sleep cycle, if initialized.
    #[must_use]
    pub fn last_outcome(&self) -> Option<WakeupOutcome> {
        self.state.session().map(|s| s.resolver.outcome())
    }

    /// Snapshot of the diagnostic counters.
    #[must_use]
    pub fn metrics(&self) -> SleepMetrics {
        self.metrics
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DeepSleepConfig {
        &self.config
    }

    /// The platform implementation.
    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Initialize the module.
    ///
    /// Resets the wakeup outcome to [`WakeupReason::Unknown`].
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` when `Ready` or `Sleeping`.
    /// - `InitFailure` when platform setup fails; the state is unchanged.
    pub fn init(&mut self) -> DeepSleepResult<()> {
        if self.state().is_initialized() {
            return Err(DeepSleepError::AlreadyInitialized);
        }

        self.platform
            .init()
            .map_err(|e| self.platform_failure(Operation::Init, e))?;

        self.set_state(ModuleState::Ready(Session::new(&self.config)));
        self.metrics.record_init();
        tracing::info!(platform = self.platform.name(), "Deep sleep module initialized");
        Ok(())
    }

    /// Enter deep sleep and block until the device wakes.
    ///
    /// Returns whether a GPIO line triggered the wake. The state is
    /// `Sleeping` while this call blocks and `Ready` again once it
    /// returns, whether the sleep succeeded or not. Call
    /// [`DeepSleepManager::wakeup`] afterwards to finalize the wake. If the
    /// previous wake was never finalized, it is finalized here before the
    /// platform suspends again.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` outside `Ready`.
    /// - `InvalidArgument` when the timeout is out of range; no platform call is made.
    /// - `WakeupFailure` when finalizing the previous wake fails; no sleep happens.
    /// - `SetFailure` when the platform cannot suspend.
    pub fn enter_deep_sleep(&mut self, request: SleepRequest) -> DeepSleepResult<bool> {
        self.require_ready(Operation::EnterDeepSleep)?;

        if let Err(e) = self.validator.validate(&request) {
            self.metrics.record_rejected();
            tracing::debug!(error = %e, "Deep sleep request rejected");
            return Err(DeepSleepError::invalid_argument(Operation::EnterDeepSleep, e));
        }

        if self.wake_pending() {
            tracing::warn!("Previous wake was not finalized; finalizing before sleeping");
            self.finalize_pending_wake()?;
        }

        let (from, taken) = self.take_state();
        let mut session = match taken {
            ModuleState::Ready(session) => session,
            other => return Err(self.reject_state(other, Operation::EnterDeepSleep)),
        };

        session.sleep_status = DeepSleepStatus::InProgress;
        self.put_state(
            from,
            ModuleState::Sleeping {
                session,
                request,
                since: Instant::now(),
            },
        );
        self.metrics.record_attempt();
        tracing::info!(
            timeout_seconds = request.timeout_seconds,
            network_standby = request.network_standby,
            "Entering deep sleep"
        );

        let result = self.platform.suspend(&request);

        let (from, taken) = self.take_state();
        let (mut session, since) = match taken {
            ModuleState::Sleeping { session, since, .. } => (session, since),
            other => return Err(self.reject_state(other, Operation::EnterDeepSleep)),
        };

        match result {
            Ok(event) => {
                let (outcome, consistent) = session.resolver.resolve(&request, &event);
                session.pending_finalize = true;
                session.sleep_status = DeepSleepStatus::Completed;
                let slept_ms = u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.record_completed(slept_ms, consistent);
                self.put_state(from, ModuleState::Ready(session));
                tracing::info!(
                    reason = %outcome.reason,
                    gpio_triggered = outcome.gpio_triggered,
                    slept_ms,
                    "Woke from deep sleep"
                );
                Ok(outcome.gpio_triggered)
            }
            Err(e) => {
                session.sleep_status = DeepSleepStatus::Failed;
                self.metrics.record_failed();
                self.put_state(from, ModuleState::Ready(session));
                Err(self.platform_failure(Operation::EnterDeepSleep, e))
            }
        }
    }

    /// Finalize the wake after [`DeepSleepManager::enter_deep_sleep`] returns.
    ///
    /// A call with nothing to finalize, because no sleep happened yet or the
    /// wake was already finalized, is a no-op that succeeds.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` before `Init` or after `Terminate`.
    /// - `WakeupFailure` when platform finalization fails. The wake stays
    ///   pending, so a later `wakeup()` retries it.
    pub fn wakeup(&mut self) -> DeepSleepResult<()> {
        if !self.state().is_initialized() {
            return Err(DeepSleepError::NotInitialized(Operation::Wakeup));
        }

        if self.state() == LifecycleState::Sleeping {
            let (from, taken) = self.take_state();
            let (mut session, request) = match taken {
                ModuleState::Sleeping {
                    session, request, ..
                } => (session, request),
                other => return Err(self.reject_state(other, Operation::Wakeup)),
            };
            tracing::warn!(
                timeout_seconds = request.timeout_seconds,
                "Wakeup issued while still sleeping; forcing Ready"
            );
            session.pending_finalize = true;
            self.put_state(from, ModuleState::Ready(session));
        }

        if !self.wake_pending() {
            self.metrics.record_redundant_wakeup();
            tracing::debug!("Wakeup with nothing to finalize");
            return Ok(());
        }

        self.finalize_pending_wake()
    }

    /// Reason the device last woke.
    ///
    /// [`WakeupReason::Unknown`] when no sleep happened in this session or
    /// the platform could not tell; neither is an error.
    ///
    /// # Errors
    ///
    /// `NotInitialized` outside `Ready`.
    pub fn last_wakeup_reason(&self) -> DeepSleepResult<WakeupReason> {
        let session = self.ready_session(Operation::GetLastWakeupReason)?;
        Ok(session.resolver.reason())
    }

    /// Key code reported with the last wake, 0 if none.
    ///
    /// Meaningful only when the last reason is a remote-control event; the
    /// caller interprets it.
    ///
    /// # Errors
    ///
    /// `NotInitialized` outside `Ready`.
    pub fn last_wakeup_key_code(&self) -> DeepSleepResult<u32> {
        let session = self.ready_session(Operation::GetLastWakeupKeyCode)?;
        Ok(session.resolver.key_code())
    }

    /// Store a wake timer for the next [`DeepSleepManager::enter_timed_deep_sleep`].
    ///
    /// # Errors
    ///
    /// - `NotInitialized` outside `Ready`.
    /// - `InvalidArgument` when the timeout is out of range.
    pub fn set_deep_sleep_timer(&mut self, timeout_seconds: u32) -> DeepSleepResult<()> {
        self.require_ready(Operation::SetDeepSleepTimer)?;
        self.validator
            .validate_timeout(timeout_seconds)
            .map_err(|e| DeepSleepError::invalid_argument(Operation::SetDeepSleepTimer, e))?;

        if let ModuleState::Ready(session) = &mut self.state {
            session.timer_seconds = Some(timeout_seconds);
        }
        tracing::debug!(timeout_seconds, "Deep sleep timer set");
        Ok(())
    }

    /// The stored wake timer, if one was set in this session.
    #[must_use]
    pub fn deep_sleep_timer(&self) -> Option<u32> {
        self.state.session().and_then(|s| s.timer_seconds)
    }

    /// Enter deep sleep using the stored wake timer, or no timer if unset.
    ///
    /// # Errors
    ///
    /// See [`DeepSleepManager::enter_deep_sleep`].
    pub fn enter_timed_deep_sleep(&mut self, network_standby: bool) -> DeepSleepResult<bool> {
        let timeout_seconds = self.deep_sleep_timer().unwrap_or(0);
        self.enter_deep_sleep(SleepRequest::new(timeout_seconds, network_standby))
    }

    /// Terminate the module and release the session.
    ///
    /// The state becomes `Terminated` even when cleanup fails.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` when already `Uninitialized` or `Terminated`.
    /// - `TermFailure` when platform cleanup fails.
    pub fn terminate(&mut self) -> DeepSleepResult<()> {
        if !self.state().is_initialized() {
            return Err(DeepSleepError::NotInitialized(Operation::Terminate));
        }

        let result = self.platform.terminate();
        self.set_state(ModuleState::Terminated);

        match result {
            Ok(()) => {
                tracing::info!("Deep sleep module terminated");
                Ok(())
            }
            Err(e) => Err(self.platform_failure(Operation::Terminate, e)),
        }
    }

    fn require_ready(&self, operation: Operation) -> DeepSleepResult<()> {
        match self.state() {
            LifecycleState::Ready => Ok(()),
            LifecycleState::Sleeping => Err(DeepSleepError::invalid_state(
                operation,
                LifecycleState::Sleeping,
            )),
            LifecycleState::Uninitialized | LifecycleState::Terminated => {
                Err(DeepSleepError::NotInitialized(operation))
            }
        }
    }

    fn wake_pending(&self) -> bool {
        self.state
            .session()
            .is_some_and(|session| session.pending_finalize)
    }

    /// Run the platform's wake-side finalization; the wake stays pending on failure.
    fn finalize_pending_wake(&mut self) -> DeepSleepResult<()> {
        self.platform
            .finalize_wake()
            .map_err(|e| self.platform_failure(Operation::Wakeup, e))?;

        if let ModuleState::Ready(session) = &mut self.state {
            session.pending_finalize = false;
        }
        self.metrics.record_finalization();
        tracing::debug!("Wake finalized");
        Ok(())
    }

    fn ready_session(&self, operation: Operation) -> DeepSleepResult<&Session> {
        self.require_ready(operation)?;
        self.state
            .session()
            .ok_or(DeepSleepError::NotInitialized(operation))
    }

    /// Put a taken state back untouched and report it as invalid for `operation`.
    fn reject_state(&mut self, state: ModuleState, operation: Operation) -> DeepSleepError {
        let lifecycle = state.lifecycle();
        self.state = state;
        DeepSleepError::invalid_state(operation, lifecycle)
    }

    fn platform_failure(
        &self,
        operation: Operation,
        source: crate::error::PlatformError,
    ) -> DeepSleepError {
        let err = DeepSleepError::from_platform(operation, source);
        tracing::warn!(
            platform = self.platform.name(),
            status = %err.status(),
            error = %err,
            "Platform operation failed"
        );
        err
    }

    fn take_state(&mut self) -> (LifecycleState, ModuleState) {
        let from = self.state.lifecycle();
        (from, std::mem::replace(&mut self.state, ModuleState::Uninitialized))
    }

    fn set_state(&mut self, next: ModuleState) {
        let from = self.state.lifecycle();
        self.put_state(from, next);
    }

    fn put_state(&mut self, from: LifecycleState, next: ModuleState) {
        self.state = next;
        let to = self.state.lifecycle();
        if from != to {
            tracing::debug!(%from, %to, "Lifecycle transition");
            for callback in &self.transition_callbacks {
                callback(from, to);
            }
        }
    }
}
