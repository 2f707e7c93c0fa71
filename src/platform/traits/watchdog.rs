//! Hardware watchdog interface
//!
//! Fed from the scheduler's `schedule()` hook on every call, including
//! calls with no registered task and calls nested inside a running task.

/// Hardware watchdog that must be reset periodically
pub trait WatchdogInterface {
    /// Reset (feed) the watchdog counter
    fn reset(&self);
}
