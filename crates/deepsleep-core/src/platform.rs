//! Platform seam for deep-sleep hardware.
//!
//! This module provides the `DeepSleepPlatform` trait that a
//! hardware-specific port implements. The controller calls it as an opaque
//! dependency and maps every error through
//! [`crate::error::DeepSleepError::from_platform`].

use crate::error::PlatformResult;
use crate::request::SleepRequest;
use crate::resolver::WakeEvent;

/// Hardware routines behind the deep-sleep contract.
///
/// # Call Ordering
///
/// The controller guarantees:
///
/// 1. `init()` precedes every other hook, and is not repeated until
///    `terminate()` has run.
/// 2. `suspend()` is only called with a validated request, and never
///    while another `suspend()` is outstanding.
/// 3. `finalize_wake()` is only called after a `suspend()` returned `Ok`.
/// 4. Every successful `suspend()` is followed by `finalize_wake()` before
///    the next `suspend()`. A sleep requested while the previous wake is
///    unfinalized runs `finalize_wake()` first and is abandoned if it fails.
///
/// # Blocking
///
/// `suspend()` blocks for the whole sleep. It returns once the device has
/// resumed or the platform gives up. Every other hook is expected to
/// return promptly.
pub trait DeepSleepPlatform: Send {
    /// Human readable platform name, used in logs.
    fn name(&self) -> &str;

    /// Prepare the platform for deep-sleep requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot be set up.
    fn init(&mut self) -> PlatformResult<()>;

    /// Suspend the device and block until it resumes.
    ///
    /// A request without a timer must only end on an external wake source.
    ///
    /// # Errors
    ///
    /// Returns an error if the device could not enter deep sleep.
    fn suspend(&mut self, request: &SleepRequest) -> PlatformResult<WakeEvent>;

    /// Restore subsystem state after a resume.
    ///
    /// # Errors
    ///
    /// Returns an error if wake-side finalization fails.
    fn finalize_wake(&mut self) -> PlatformResult<()>;

    /// Release all platform resources.
    ///
    /// # Errors
    ///
    /// Returns an error if cleanup cannot complete.
    fn terminate(&mut self) -> PlatformResult<()>;
}

impl<P: DeepSleepPlatform + ?Sized> DeepSleepPlatform for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init(&mut self) -> PlatformResult<()> {
        (**self).init()
    }

    fn suspend(&mut self, request: &SleepRequest) -> PlatformResult<WakeEvent> {
        (**self).suspend(request)
    }

    fn finalize_wake(&mut self) -> PlatformResult<()> {
        (**self).finalize_wake()
    }

    fn terminate(&mut self) -> PlatformResult<()> {
        (**self).terminate()
    }
}
