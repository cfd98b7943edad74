//! # deepsleep-core
//!
//! Deep-sleep power-state management for set-top-box class devices.
//!
//! This crate provides the client-side deep-sleep contract with:
//! - `DeepSleepManager`, a lifecycle controller that gates every operation
//! - `WakeupResolver` and the closed `WakeupReason` set
//! - `SleepRequestValidator` for the timeout bounds
//! - `DeepSleepError`, mapped onto the closed `StatusCode` taxonomy
//! - `DeepSleepPlatform`, the seam a hardware port implements
//! - `SimulatedPlatform` for tests and hardware-free environments
//!
//! ## State Machine
//!
//! ```text
//! ┌───────────────┐  init()   ┌───────┐ enter_deep_sleep() ┌──────────┐
//! │ Uninitialized │──────────►│ Ready │───────────────────►│ Sleeping │
//! └───────────────┘           └───────┘◄───────────────────└──────────┘
//!                              ▲    │        device wakes
//!                       init() │    │ terminate()
//!                              │    ▼
//!                           ┌────────────┐
//!                           │ Terminated │
//!                           └────────────┘
//! ```
//!
//! ## Timeouts
//!
//! A timeout is a whole number of seconds in `[0, 604800]`. Zero means no
//! timer: the device sleeps until an external wake source fires.
//!
//! ## Example
//!
//! ```rust
//! use deepsleep_core::prelude::*;
//! use std::time::Duration;
//!
//! let (platform, _trigger) = SimulatedPlatform::new();
//! let mut manager = DeepSleepManager::new(platform.with_second_length(Duration::ZERO));
//!
//! assert_eq!(manager.wakeup().status(), StatusCode::NotInitialized);
//!
//! manager.init()?;
//! let rejected = manager.enter_deep_sleep(SleepRequest::new(604_801, false));
//! assert_eq!(rejected.status(), StatusCode::InvalidArgument);
//!
//! manager.enter_deep_sleep(SleepRequest::new(60, false))?;
//! manager.wakeup()?;
//! assert_eq!(manager.last_wakeup_reason()?, WakeupReason::Timer);
//! manager.terminate()?;
//! # Ok::<(), DeepSleepError>(())
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod platform;
pub mod prelude;
pub mod reason;
pub mod request;
pub mod resolver;
pub mod simulated;
pub mod status;
pub mod validator;

pub use config::{DeepSleepConfig, DeepSleepConfigBuilder};
pub use error::{
    DeepSleepError, DeepSleepResult, Operation, PlatformError, PlatformResult, StatusExt,
    ValidationError,
};
pub use lifecycle::{DeepSleepManager, DeepSleepStatus, LifecycleState, TransitionCallback};
pub use metrics::SleepMetrics;
pub use platform::DeepSleepPlatform;
pub use reason::WakeupReason;
pub use request::{MAX_DEEP_SLEEP_TIMEOUT_SECS, SleepRequest};
pub use resolver::{WakeEvent, WakeupOutcome, WakeupResolver};
pub use simulated::{SimulatedCalls, SimulatedFaults, SimulatedPlatform, WakeTrigger};
pub use status::StatusCode;
pub use validator::{SleepRequestValidator, check_network_consistency};
