//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::GpioInterface,
    Result,
};

/// Mock GPIO implementation
///
/// Tracks pin level, direction and the number of level writes for test
/// verification. A pin can be marked faulty to simulate read failures.
#[derive(Debug)]
pub struct MockGpio {
    pin: u8,
    level: bool,
    output: bool,
    writes: u32,
    faulty: bool,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode
    pub fn new_output(pin: u8) -> Self {
        Self {
            pin,
            level: false,
            output: true,
            writes: 0,
            faulty: false,
        }
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input(pin: u8) -> Self {
        Self {
            output: false,
            ..Self::new_output(pin)
        }
    }

    /// Make subsequent level reads fail
    pub fn set_faulty(&mut self, faulty: bool) {
        self.faulty = faulty;
    }

    /// Number of successful `set_level` calls
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl GpioInterface for MockGpio {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        if !self.output {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.level = high;
        self.writes += 1;
        Ok(())
    }

    fn level(&self) -> Result<bool> {
        if self.faulty {
            return Err(PlatformError::Gpio(GpioError::ReadFailed));
        }
        Ok(self.level)
    }
}
