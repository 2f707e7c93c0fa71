//! GPIO interface trait
//!
//! Output lines driven by device drivers (indicator LEDs, reset lines).

use crate::platform::Result;

/// GPIO interface trait
///
/// # Safety Invariants
///
/// - Only one owner per GPIO pin instance
/// - Pin number must be valid for the platform
pub trait GpioInterface {
    /// Platform pin number (offset within the GPIO bank)
    fn pin(&self) -> u8;

    /// Drive the line high or low
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn set_level(&mut self, high: bool) -> Result<()>;

    /// Read the current line level
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if the level cannot be sampled.
    fn level(&self) -> Result<bool>;

    /// Invert the line level
    fn toggle(&mut self) -> Result<()> {
        let high = self.level()?;
        self.set_level(!high)
    }
}
