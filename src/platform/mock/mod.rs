//! Mock platform implementation for testing
//!
//! Mock implementations of the platform traits for host tests.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use cyclic_sched::platform::mock::MockTime;
//! use cyclic_sched::platform::TimeSource;
//!
//! let time = MockTime::new();
//! time.advance(1500);
//! assert_eq!(time.now_us(), 1500);
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod time;
mod watchdog;

pub use gpio::MockGpio;
pub use time::MockTime;
pub use watchdog::MockWatchdog;
