//! GPIO LED driver
//!
//! Drives an indicator LED through a [`GpioInterface`] line. Blinking is
//! done in software: an active blink session is one periodic task on the
//! cyclic scheduler that inverts the line every half period.
//!
//! # Example
//!
//! ```
//! use cyclic_sched::core::scheduler::Scheduler;
//! use cyclic_sched::devices::led::{GpioLed, LedState};
//! use cyclic_sched::platform::mock::{MockGpio, MockTime};
//!
//! let time = MockTime::new();
//! let led = GpioLed::new(MockGpio::new_output(25));
//! let scheduler = Scheduler::new(&time);
//!
//! led.set_period(&scheduler, 500).unwrap();
//! assert_eq!(led.state(), Ok(LedState::Blink));
//!
//! led.set_state(&scheduler, LedState::Off).unwrap();
//! assert_eq!(led.state(), Ok(LedState::Off));
//! assert_eq!(scheduler.task_count(), 0);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt::Write;

use super::{LedError, LedState};
use crate::core::scheduler::{Runnable, Scheduler, TaskHandle};
use crate::platform::{GpioInterface, TimeSource};

/// Longest blink task name: "gpio_cyclic" plus a three-digit pin
const TASK_NAME_LEN: usize = 16;

/// LED on a GPIO line
pub struct GpioLed<G: GpioInterface> {
    gpio: RefCell<G>,
    /// Blink task name, `gpio_cyclic<pin>`
    task_name: heapless::String<TASK_NAME_LEN>,
    blink: Cell<Option<TaskHandle>>,
}

impl<G: GpioInterface> GpioLed<G> {
    /// Wrap an output line; the current level is left untouched
    pub fn new(gpio: G) -> Self {
        let mut task_name = heapless::String::new();
        // Cannot overflow: u8 pin is at most three digits
        let _ = write!(task_name, "gpio_cyclic{}", gpio.pin());

        Self {
            gpio: RefCell::new(gpio),
            task_name,
            blink: Cell::new(None),
        }
    }

    /// Name of the blink task registered by [`set_period`](Self::set_period)
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Whether a blink session is active
    pub fn is_blinking(&self) -> bool {
        self.blink.get().is_some()
    }

    /// Set a static state, ending any blink session
    ///
    /// # Errors
    ///
    /// - `LedError::Unsupported` for [`LedState::Blink`]; use
    ///   [`set_period`](Self::set_period) instead
    /// - `LedError::Platform` if the line cannot be read or driven
    pub fn set_state<T: TimeSource, const N: usize>(
        &self,
        scheduler: &Scheduler<'_, T, N>,
        state: LedState,
    ) -> Result<(), LedError> {
        if state == LedState::Blink {
            return Err(LedError::Unsupported);
        }

        self.stop_blink(scheduler);

        let mut gpio = self.gpio.borrow_mut();
        match state {
            LedState::On => gpio.set_level(true)?,
            LedState::Off => gpio.set_level(false)?,
            LedState::Toggle => gpio.toggle()?,
            LedState::Blink => {}
        }
        Ok(())
    }

    /// Current state; [`LedState::Blink`] while a blink session is active
    ///
    /// # Errors
    ///
    /// `LedError::Platform` if the line level cannot be read.
    pub fn state(&self) -> Result<LedState, LedError> {
        if self.is_blinking() {
            return Ok(LedState::Blink);
        }

        let high = self.gpio.borrow().level()?;
        Ok(if high { LedState::On } else { LedState::Off })
    }

    /// Start or retime a blink session
    ///
    /// Any previous session is ended first. The LED is switched on and a
    /// toggle task is registered every `period_ms / 2`.
    ///
    /// # Errors
    ///
    /// - `LedError::InvalidPeriod` if `period_ms` is zero
    /// - `LedError::Platform` if the line cannot be driven
    /// - `LedError::Scheduler` if the scheduler has no free slot
    pub fn set_period<'a, T: TimeSource, const N: usize>(
        &'a self,
        scheduler: &Scheduler<'a, T, N>,
        period_ms: u32,
    ) -> Result<(), LedError> {
        if period_ms == 0 {
            return Err(LedError::InvalidPeriod);
        }

        self.stop_blink(scheduler);
        self.gpio.borrow_mut().set_level(true)?;

        let half_period_us = period_ms as u64 * 500;
        let handle = scheduler.register(self.task_name.as_str(), self, half_period_us)?;
        self.blink.set(Some(handle));

        crate::log_debug!(
            "led: {} blinking every {}ms",
            self.task_name.as_str(),
            period_ms
        );
        Ok(())
    }

    /// End the blink session, if any; the line keeps its current level
    pub fn stop_blink<T: TimeSource, const N: usize>(&self, scheduler: &Scheduler<'_, T, N>) {
        if let Some(handle) = self.blink.take() {
            // Already gone if the host cleared the scheduler
            let _ = scheduler.unregister(handle);
        }
    }

    /// Release the underlying line
    pub fn into_inner(self) -> G {
        self.gpio.into_inner()
    }
}

impl<G: GpioInterface> Runnable for GpioLed<G> {
    fn run(&self, _handle: TaskHandle) {
        let Ok(mut gpio) = self.gpio.try_borrow_mut() else {
            return;
        };
        if let Err(e) = gpio.toggle() {
            crate::log_error!("led: cannot toggle GPIO {}: {}", gpio.pin(), e);
        }
    }
}
