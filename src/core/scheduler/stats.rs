//! Task execution accounting
//!
//! Per-task statistics are updated after each invocation; scheduler-wide
//! counters are updated once per tick.

/// Runtime statistics for a single task
///
/// Reset on every registration; a re-registered task starts from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskStats {
    /// Total number of invocations
    pub run_count: u64,

    /// Cumulative measured execution time in microseconds
    pub cpu_time_us: u64,

    /// Duration of the most recent invocation in microseconds
    pub last_execution_us: u64,

    /// Longest invocation observed in microseconds
    pub max_execution_us: u64,

    /// Set by the first invocation exceeding the overrun threshold
    ///
    /// Never cleared while the task stays registered, so the overrun
    /// diagnostic fires at most once per registration.
    pub overrun_warned: bool,
}

impl TaskStats {
    /// Account one invocation
    ///
    /// # Arguments
    ///
    /// * `execution_us` - Measured duration of the invocation
    /// * `max_cpu_time_us` - Overrun threshold in force for this tick
    ///
    /// # Returns
    ///
    /// `true` if this invocation overran and the latch was not yet set; the
    /// caller emits the diagnostic exactly when this returns `true`.
    pub fn record(&mut self, execution_us: u64, max_cpu_time_us: u32) -> bool {
        self.run_count = self.run_count.saturating_add(1);
        self.cpu_time_us = self.cpu_time_us.saturating_add(execution_us);
        self.last_execution_us = execution_us;

        if execution_us > self.max_execution_us {
            self.max_execution_us = execution_us;
        }

        if execution_us > max_cpu_time_us as u64 && !self.overrun_warned {
            self.overrun_warned = true;
            return true;
        }
        false
    }

    /// Average execution time in microseconds (0 before the first run)
    pub fn avg_execution_us(&self) -> u64 {
        if self.run_count == 0 {
            0
        } else {
            self.cpu_time_us / self.run_count
        }
    }
}

/// Scheduler-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerStats {
    /// Completed registry sweeps
    pub sweep_count: u64,

    /// Tick calls absorbed because a sweep was already in progress
    pub nested_tick_count: u64,

    /// Task invocations across all tasks, including unregistered ones
    pub run_count: u64,

    /// Overrun diagnostics emitted
    pub overrun_count: u32,
}
