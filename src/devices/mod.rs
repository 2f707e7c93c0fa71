//! Device drivers
//!
//! Drivers built on the platform abstraction traits that hand periodic
//! work to the cyclic scheduler.
//!
//! ## Modules
//!
//! - `led`: Indicator LEDs (GPIO, software blink)

pub mod led;
