//! Task listing for diagnostics
//!
//! Reports every registered task with its accumulated CPU time, per-call
//! execution times, run count and average invocation rate, in the spirit of a "cyclic list" console
//! command.

use super::cyclic::Scheduler;
use super::types::TaskInfo;
use crate::platform::TimeSource;

/// Rate as whole hertz plus thousandths, from milli-hertz
fn split_frequency(mhz: u64) -> (u64, u64) {
    (mhz / 1000, mhz % 1000)
}

/// Log one line for a task
fn report_task(info: &TaskInfo<'_>, now_us: u64) {
    let (hz, frac) = split_frequency(info.frequency_millihz(now_us));
    crate::log_info!(
        "function: {}, cpu-time: {} us (last {} avg {} max {}), runs: {}, frequency: {}.{}{}{} times/s",
        info.name,
        info.stats.cpu_time_us,
        info.stats.last_execution_us,
        info.stats.avg_execution_us(),
        info.stats.max_execution_us,
        info.stats.run_count,
        hz,
        frac / 100,
        (frac / 10) % 10,
        frac % 10
    );
}

/// Report all registered tasks and scheduler counters
///
/// Returns the number of tasks reported.
pub fn report_tasks<T: TimeSource, const N: usize>(scheduler: &Scheduler<'_, T, N>) -> usize {
    let now_us = scheduler.time().now_us();
    let tasks = scheduler.tasks();
    let stats = scheduler.stats();

    crate::log_info!(
        "Cyclic: {} tasks, sweeps={} nested={} runs={} overruns={} max-cpu-time={}us",
        tasks.len(),
        stats.sweep_count,
        stats.nested_tick_count,
        stats.run_count,
        stats.overrun_count,
        scheduler.max_cpu_time_us()
    );

    for (_, info) in tasks.iter() {
        report_task(info, now_us);
    }

    tasks.len()
}
