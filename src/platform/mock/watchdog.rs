//! Mock watchdog for testing

use crate::platform::traits::WatchdogInterface;
use core::cell::Cell;

/// Mock watchdog that counts resets
#[derive(Debug, Default)]
pub struct MockWatchdog {
    resets: Cell<u32>,
}

impl MockWatchdog {
    /// Create a new mock watchdog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the watchdog has been fed
    pub fn resets(&self) -> u32 {
        self.resets.get()
    }
}

impl WatchdogInterface for MockWatchdog {
    fn reset(&self) {
        self.resets.set(self.resets.get() + 1);
    }
}
