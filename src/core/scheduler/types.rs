//! Core types for the cyclic scheduler
//!
//! - [`Runnable`]: the callback capability a task invokes
//! - [`TaskHandle`]: stable identity of one registration
//! - [`TaskInfo`]: snapshot of a registered task and its bookkeeping
//! - [`SchedulerError`]: registration errors

use super::stats::TaskStats;
use core::fmt;

/// Maximum number of tasks a scheduler holds by default
///
/// Current allocation: 32 slots x ~96 bytes = ~3KB
pub const MAX_TASKS: usize = 32;

/// Work executed by a periodic task
///
/// Implemented for every `Fn(TaskHandle)` closure, so most callers pass a
/// closure. Drivers that own their state implement it on the driver type
/// and register `&self`; state changed from `run` needs interior
/// mutability because the scheduler only holds a shared reference.
///
/// Callbacks should be short and must not block. A callback that reaches
/// the scheduler's tick again (through a delay or wait primitive) is safe:
/// the nested tick returns immediately.
pub trait Runnable {
    /// Execute one period's worth of work
    ///
    /// `handle` is the registration being executed.
    fn run(&self, handle: TaskHandle);
}

impl<F> Runnable for F
where
    F: Fn(TaskHandle),
{
    fn run(&self, handle: TaskHandle) {
        self(handle)
    }
}

/// Stable identity of one registration
///
/// Slots are reused after unregistration; the generation distinguishes a
/// live registration from a stale handle to an earlier occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHandle {
    pub(crate) index: u16,
    pub(crate) generation: u16,
}

impl TaskHandle {
    /// Slot index inside the registry
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Snapshot of one registered task
#[derive(Debug, Clone, Copy)]
pub struct TaskInfo<'a> {
    /// Diagnostic label (not unique)
    pub name: &'a str,
    /// Requested minimum interval between invocations
    pub period_us: u64,
    /// Registration time
    pub start_time_us: u64,
    /// Earliest time of the next invocation
    pub next_due_us: u64,
    /// Execution accounting
    pub stats: TaskStats,
}

impl TaskInfo<'_> {
    /// Average invocation rate since registration, in milli-hertz
    ///
    /// Returns 0 until any time has elapsed.
    pub fn frequency_millihz(&self, now_us: u64) -> u64 {
        let elapsed = now_us.wrapping_sub(self.start_time_us);
        if elapsed == 0 {
            return 0;
        }
        ((self.stats.run_count as u128 * 1_000_000_000) / elapsed as u128) as u64
    }
}

/// Registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Every slot of the registry is occupied
    RegistryFull,
    /// Handle does not refer to a live registration (never registered,
    /// already unregistered, or stale)
    NotRegistered,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::RegistryFull => write!(f, "cyclic task registry full"),
            SchedulerError::NotRegistered => write!(f, "cyclic task not registered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(run_count: u64, start_time_us: u64) -> TaskInfo<'static> {
        TaskInfo {
            name: "info",
            period_us: 1000,
            start_time_us,
            next_due_us: 0,
            stats: TaskStats {
                run_count,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_frequency() {
        // 250 runs over 0.5s = 500 Hz
        let task = info(250, 1_000_000);
        assert_eq!(task.frequency_millihz(1_500_000), 500_000);

        // 3 runs over 2s = 1.5 Hz
        let task = info(3, 0);
        assert_eq!(task.frequency_millihz(2_000_000), 1_500);

        assert_eq!(task.frequency_millihz(0), 0);
    }

    #[test]
    fn test_closure_is_runnable() {
        use core::cell::Cell;

        let seen = Cell::new(None);
        let task = |handle: TaskHandle| seen.set(Some(handle.index()));
        let runnable: &dyn Runnable = &task;

        runnable.run(TaskHandle {
            index: 3,
            generation: 0,
        });
        assert_eq!(seen.get(), Some(3));
    }
}
