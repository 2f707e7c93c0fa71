//! Indicator LED drivers
//!
//! ## Modules
//!
//! - `gpio`: GPIO-driven LED with software blink on the cyclic scheduler

pub mod gpio;

pub use gpio::GpioLed;

use core::fmt;

use crate::core::scheduler::SchedulerError;
use crate::platform::PlatformError;

/// LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Off,
    On,
    /// Invert the current level (request only, never reported)
    Toggle,
    /// Software blink session active (reported only, never requested)
    Blink,
}

/// LED driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// GPIO access failed
    Platform(PlatformError),
    /// Blink task could not be registered
    Scheduler(SchedulerError),
    /// Requested state cannot be set directly
    Unsupported,
    /// Blink period of zero
    InvalidPeriod,
}

impl From<PlatformError> for LedError {
    fn from(e: PlatformError) -> Self {
        LedError::Platform(e)
    }
}

impl From<SchedulerError> for LedError {
    fn from(e: SchedulerError) -> Self {
        LedError::Scheduler(e)
    }
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::Platform(e) => write!(f, "LED GPIO error: {}", e),
            LedError::Scheduler(e) => write!(f, "LED blink task error: {}", e),
            LedError::Unsupported => write!(f, "LED state not supported"),
            LedError::InvalidPeriod => write!(f, "LED blink period must be non-zero"),
        }
    }
}
