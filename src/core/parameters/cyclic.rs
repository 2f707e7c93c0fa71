//! Cyclic scheduler parameters
//!
//! # Parameters
//!
//! - `cyclic_max_cpu_time` - overrun diagnostic threshold in microseconds.
//!   A single task invocation running longer than this is reported once.
//!
//! The compiled default comes from the `CYCLIC_MAX_CPU_TIME_US` build-time
//! environment variable (see build.rs). Deleting the setting, or setting it
//! to an empty or non-numeric value, restores the default.

use super::{const_parse_u32, parse_u32, ParamOp, ParameterError};
use core::cell::Cell;

/// Name of the overrun threshold setting
pub const PARAM_MAX_CPU_TIME: &str = "cyclic_max_cpu_time";

/// Fallback when build.rs exports an unusable value
const FALLBACK_MAX_CPU_TIME_US: u32 = 1000;

/// Compiled default overrun threshold (microseconds)
pub const DEFAULT_MAX_CPU_TIME_US: u32 = {
    const S: &str = env!("CYCLIC_MAX_CPU_TIME_US");
    const_parse_u32(S, FALLBACK_MAX_CPU_TIME_US)
};

/// Runtime-tunable scheduler settings
#[derive(Debug)]
pub struct CyclicParams {
    max_cpu_time_us: Cell<u32>,
    default_max_cpu_time_us: u32,
}

impl CyclicParams {
    /// Settings at their compiled defaults
    pub const fn new() -> Self {
        Self::with_default(DEFAULT_MAX_CPU_TIME_US)
    }

    /// Settings with a caller-chosen default threshold
    pub const fn with_default(max_cpu_time_us: u32) -> Self {
        Self {
            max_cpu_time_us: Cell::new(max_cpu_time_us),
            default_max_cpu_time_us: max_cpu_time_us,
        }
    }

    /// Current overrun threshold
    pub fn max_cpu_time_us(&self) -> u32 {
        self.max_cpu_time_us.get()
    }

    /// Default the threshold falls back to
    pub fn default_max_cpu_time_us(&self) -> u32 {
        self.default_max_cpu_time_us
    }

    /// Set the overrun threshold directly
    pub fn set_max_cpu_time_us(&self, us: u32) {
        self.max_cpu_time_us.set(us);
    }

    /// Restore the compiled default
    pub fn reset(&self) {
        self.max_cpu_time_us.set(self.default_max_cpu_time_us);
    }

    /// Apply a change notification from the configuration layer
    ///
    /// Returns the threshold now in force. Takes effect on the next tick.
    ///
    /// # Errors
    ///
    /// `ParameterError::NotFound` if `name` is not a scheduler setting; the
    /// current value is left untouched.
    pub fn apply(&self, name: &str, op: ParamOp, value: &str) -> Result<u32, ParameterError> {
        if name != PARAM_MAX_CPU_TIME {
            return Err(ParameterError::NotFound);
        }

        match (op, parse_u32(value)) {
            (ParamOp::Delete, _) => self.reset(),
            (_, Some(us)) => self.set_max_cpu_time_us(us),
            (_, None) => {
                if !value.trim().is_empty() {
                    crate::log_warn!(
                        "{}: invalid value '{}', using default {}us",
                        PARAM_MAX_CPU_TIME,
                        value,
                        self.default_max_cpu_time_us
                    );
                }
                self.reset();
            }
        }

        crate::log_debug!(
            "{} = {}us",
            PARAM_MAX_CPU_TIME,
            self.max_cpu_time_us.get()
        );
        Ok(self.max_cpu_time_us.get())
    }
}

impl Default for CyclicParams {
    fn default() -> Self {
        Self::new()
    }
}
