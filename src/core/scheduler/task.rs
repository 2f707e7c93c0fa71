//! Task execution helpers and timing measurement
//!
//! Wraps one callback invocation with timing instrumentation. The start
//! timestamp is supplied by the caller (the scheduler reuses the reading it
//! took for the due check); elapsed time is measured against it here.

use crate::platform::TimeSource;

/// Measure execution time of a task body
///
/// # Arguments
///
/// * `time` - Clock the start timestamp was taken from
/// * `start_us` - Timestamp taken immediately before the call
/// * `f` - Closure containing the task logic to execute
///
/// # Returns
///
/// The closure's result and the elapsed microseconds. Elapsed time is
/// computed with wrapping arithmetic so a clock wrap during the call still
/// yields the true duration.
pub fn execute_with_timing<T, F, R>(time: &T, start_us: u64, f: F) -> (R, u64)
where
    T: TimeSource + ?Sized,
    F: FnOnce() -> R,
{
    let result = f();
    let execution_us = time.elapsed_since(start_us);
    (result, execution_us)
}
