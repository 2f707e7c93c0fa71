//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod time;
pub mod watchdog;

// Re-export trait interfaces
pub use gpio::GpioInterface;
pub use time::{time_after_eq, TimeSource};
pub use watchdog::WatchdogInterface;
