//! Platform abstraction layer
//!
//! Hardware services the scheduler and drivers depend on: a monotonic
//! microsecond clock, GPIO lines and an optional hardware watchdog.
//! Board support code implements these traits; host tests use the mocks.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{GpioError, PlatformError, Result};
pub use traits::{time_after_eq, GpioInterface, TimeSource, WatchdogInterface};
