//! Prelude for deepsleep-core.
//!
//! Re-exports the types a controller client needs.
//!
//! # Example
//!
//! ```rust
//! use deepsleep_core::prelude::*;
//!
//! let (platform, _trigger) = SimulatedPlatform::new();
//! let mut manager = DeepSleepManager::new(platform);
//! assert_eq!(manager.init().status(), StatusCode::Success);
//! ```

pub use crate::config::{DeepSleepConfig, DeepSleepConfigBuilder};
pub use crate::error::{
    DeepSleepError, DeepSleepResult, Operation, PlatformError, PlatformResult, StatusExt,
    ValidationError,
};
pub use crate::lifecycle::{DeepSleepManager, DeepSleepStatus, LifecycleState};
pub use crate::metrics::SleepMetrics;
pub use crate::platform::DeepSleepPlatform;
pub use crate::reason::WakeupReason;
pub use crate::request::{MAX_DEEP_SLEEP_TIMEOUT_SECS, SleepRequest};
pub use crate::resolver::{WakeEvent, WakeupOutcome};
pub use crate::simulated::{SimulatedFaults, SimulatedPlatform, WakeTrigger};
pub use crate::status::StatusCode;
