//! Cooperative cyclic scheduler
//!
//! The [`Scheduler`] is the context object the host creates at startup and
//! hands to every subsystem that registers periodic work. It is driven by
//! the host's wait and idle points calling [`Scheduler::schedule`] (or
//! [`Scheduler::tick`]); nothing runs unless the host keeps calling it.
//!
//! All methods take `&self`: task callbacks may register, unregister or
//! re-enter the tick while a sweep is in progress. The context is `!Sync`
//! and must stay on the thread that owns it.

use core::cell::{Cell, RefCell};

use super::registry::{TaskEntry, TaskRegistry};
use super::stats::SchedulerStats;
use super::task::execute_with_timing;
use super::types::{Runnable, SchedulerError, TaskHandle, TaskInfo, MAX_TASKS};
use crate::core::parameters::{CyclicParams, ParamOp, ParameterError};
use crate::platform::{time_after_eq, TimeSource, WatchdogInterface};

/// Cooperative periodic-task scheduler
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use cyclic_sched::core::scheduler::{Scheduler, TaskHandle};
/// use cyclic_sched::platform::mock::MockTime;
///
/// let time = MockTime::new();
/// let polls = Cell::new(0);
/// let poll = |_: TaskHandle| polls.set(polls.get() + 1);
///
/// let scheduler = Scheduler::new(&time);
/// scheduler.register("poll", &poll, 1_000).unwrap();
///
/// scheduler.tick(); // due immediately after registration
/// scheduler.tick(); // not due again until t=1000
/// time.advance(1_000);
/// scheduler.tick();
/// assert_eq!(polls.get(), 2);
/// ```
pub struct Scheduler<'a, T: TimeSource, const N: usize = MAX_TASKS> {
    time: T,
    registry: RefCell<TaskRegistry<'a, N>>,
    /// Re-entrancy guard: set while a sweep is in progress
    running: Cell<bool>,
    params: CyclicParams,
    watchdog: Option<&'a dyn WatchdogInterface>,
    stats: Cell<SchedulerStats>,
}

impl<'a, T: TimeSource> Scheduler<'a, T> {
    /// Scheduler with [`MAX_TASKS`] slots and default parameters
    pub fn new(time: T) -> Self {
        Self::with_params(time, CyclicParams::new())
    }
}

impl<'a, T: TimeSource, const N: usize> Scheduler<'a, T, N> {
    /// Scheduler with `N` slots and the given parameters
    pub fn with_params(time: T, params: CyclicParams) -> Self {
        Self {
            time,
            registry: RefCell::new(TaskRegistry::new()),
            running: Cell::new(false),
            params,
            watchdog: None,
            stats: Cell::new(SchedulerStats::default()),
        }
    }

    /// Feed `watchdog` from every [`schedule`](Self::schedule) call
    pub fn with_watchdog(mut self, watchdog: &'a dyn WatchdogInterface) -> Self {
        self.watchdog = Some(watchdog);
        self
    }

    /// Clock the scheduler measures against
    pub fn time(&self) -> &T {
        &self.time
    }

    /// Register a periodic task
    ///
    /// The task is due immediately: the first tick after registration runs
    /// it, then at most once per `period_us`. Bookkeeping starts from zero
    /// even when the same callback was registered before.
    ///
    /// # Errors
    ///
    /// `SchedulerError::RegistryFull` if all `N` slots are in use.
    pub fn register(
        &self,
        name: &'a str,
        callback: &'a dyn Runnable,
        period_us: u64,
    ) -> Result<TaskHandle, SchedulerError> {
        let now_us = self.time.now_us();
        let result = self
            .registry
            .borrow_mut()
            .insert(TaskEntry::new(name, callback, period_us, now_us));

        match result {
            Ok(handle) => {
                crate::log_debug!("cyclic: registered {} every {}us", name, period_us);
                Ok(handle)
            }
            Err(e) => {
                crate::log_error!("cyclic: cannot register {}: registry full ({})", name, N);
                Err(e)
            }
        }
    }

    /// Remove a task
    ///
    /// Takes effect immediately, including later in a sweep that is in
    /// progress. The handle is dead afterwards.
    ///
    /// # Errors
    ///
    /// `SchedulerError::NotRegistered` if the handle was already
    /// unregistered or belongs to a previous occupant of the slot.
    pub fn unregister(&self, handle: TaskHandle) -> Result<(), SchedulerError> {
        let task = self.registry.borrow_mut().remove(handle)?;
        crate::log_debug!(
            "cyclic: unregistered {} after {} runs",
            task.name,
            task.stats.run_count
        );
        Ok(())
    }

    /// Remove every task; returns how many were removed
    pub fn unregister_all(&self) -> usize {
        self.registry.borrow_mut().clear()
    }

    /// Whether `handle` refers to a live registration
    pub fn is_registered(&self, handle: TaskHandle) -> bool {
        self.registry.borrow().get(handle).is_some()
    }

    /// Number of registered tasks
    pub fn task_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Maximum number of simultaneously registered tasks
    pub fn capacity(&self) -> usize {
        self.registry.borrow().capacity()
    }

    /// Snapshot of one task
    pub fn task_info(&self, handle: TaskHandle) -> Option<TaskInfo<'a>> {
        self.registry.borrow().get(handle).map(TaskEntry::info)
    }

    /// Snapshot of every task in registry order
    pub fn tasks(&self) -> heapless::Vec<(TaskHandle, TaskInfo<'a>), N> {
        self.registry
            .borrow()
            .iter()
            .map(|(handle, task)| (handle, task.info()))
            .collect()
    }

    /// Whether a sweep is in progress
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Scheduler-wide counters
    pub fn stats(&self) -> SchedulerStats {
        self.stats.get()
    }

    /// Runtime parameters
    pub fn params(&self) -> &CyclicParams {
        &self.params
    }

    /// Overrun threshold consulted by the next tick
    pub fn max_cpu_time_us(&self) -> u32 {
        self.params.max_cpu_time_us()
    }

    /// Configuration change hook
    ///
    /// Forward every setting change here; settings that do not belong to
    /// the scheduler are rejected with `ParameterError::NotFound`.
    pub fn on_param_change(
        &self,
        name: &str,
        op: ParamOp,
        value: &str,
    ) -> Result<u32, ParameterError> {
        self.params.apply(name, op, value)
    }

    /// Generic yield point: feed the watchdog, then tick
    ///
    /// The watchdog is fed on every call, even when no task is registered
    /// or when the call is nested inside a running task.
    pub fn schedule(&self) {
        if let Some(watchdog) = self.watchdog {
            watchdog.reset();
        }
        self.tick();
    }

    /// Busy-wait for `us` microseconds, yielding to the scheduler
    ///
    /// Calls [`schedule`](Self::schedule) at least once, then on every
    /// iteration until the deadline passes. Only returns if the clock
    /// advances.
    pub fn delay_us(&self, us: u64) {
        let deadline = self.time.now_us().wrapping_add(us);
        loop {
            self.schedule();
            if time_after_eq(self.time.now_us(), deadline) {
                break;
            }
            core::hint::spin_loop();
        }
    }

    /// Run every due task once
    ///
    /// A call made while a sweep is already in progress (from inside a task
    /// callback) returns immediately without touching the registry.
    pub fn tick(&self) {
        if self.running.replace(true) {
            self.update_stats(|stats| stats.nested_tick_count += 1);
            return;
        }
        let _guard = SweepGuard { scheduler: self };

        self.registry.borrow_mut().begin_sweep();
        loop {
            let next = self.registry.borrow_mut().next_in_sweep();
            match next {
                Some(handle) => self.run_if_due(handle),
                None => break,
            }
        }

        self.update_stats(|stats| stats.sweep_count += 1);
    }

    fn run_if_due(&self, handle: TaskHandle) {
        // Time is re-read for every task instead of once per sweep, so a
        // task is judged against the moment it is looked at, after any
        // slow tasks ahead of it. Under heavy load this shifts later tasks'
        // schedules; keep it that way.
        let now_us = self.time.now_us();

        let callback = {
            let mut registry = self.registry.borrow_mut();
            let Some(task) = registry.get_mut(handle) else {
                return;
            };
            if !time_after_eq(now_us, task.next_due_us) {
                return;
            }
            // Relative to the actual run, not a fixed grid: a late task
            // runs once and moves on instead of catching up.
            task.next_due_us = now_us.wrapping_add(task.period_us);
            task.callback
        };

        // No registry borrow is held while the callback runs
        let ((), execution_us) =
            execute_with_timing(&self.time, now_us, || callback.run(handle));

        let max_cpu_time_us = self.params.max_cpu_time_us();
        let overrun = {
            let mut registry = self.registry.borrow_mut();
            // None if the callback unregistered its own task
            registry.get_mut(handle).and_then(|task| {
                task.stats
                    .record(execution_us, max_cpu_time_us)
                    .then_some(task.name)
            })
        };

        self.update_stats(|stats| {
            stats.run_count += 1;
            if overrun.is_some() {
                stats.overrun_count += 1;
            }
        });

        if let Some(name) = overrun {
            // Warn once per registration; the task keeps running
            crate::log_error!(
                "cyclic function {} took too long: {}us vs {}us max",
                name,
                execution_us,
                max_cpu_time_us
            );
        }
    }

    fn update_stats(&self, f: impl FnOnce(&mut SchedulerStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Clears the re-entrancy guard when a sweep ends, including by unwinding
struct SweepGuard<'s, 'a, T: TimeSource, const N: usize> {
    scheduler: &'s Scheduler<'a, T, N>,
}

impl<T: TimeSource, const N: usize> Drop for SweepGuard<'_, '_, T, N> {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.scheduler.registry.try_borrow_mut() {
            registry.end_sweep();
        }
        self.scheduler.running.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockTime, MockWatchdog};

    fn counter(count: &Cell<u32>) -> impl Fn(TaskHandle) + '_ {
        move |_| count.set(count.get() + 1)
    }

    #[test]
    fn test_runs_immediately_then_every_period() {
        let time = MockTime::with_initial(500);
        let count = Cell::new(0);
        let task = counter(&count);

        let scheduler = Scheduler::new(&time);
        let handle = scheduler.register("task", &task, 1000).unwrap();

        scheduler.tick();
        assert_eq!(count.get(), 1);

        time.set(1499);
        scheduler.tick();
        assert_eq!(count.get(), 1);

        time.set(1500);
        scheduler.tick();
        assert_eq!(count.get(), 2);

        let info = scheduler.task_info(handle).unwrap();
        assert_eq!(info.start_time_us, 500);
        assert_eq!(info.next_due_us, 2500);
        assert_eq!(info.stats.run_count, 2);
    }

    #[test]
    fn test_no_run_before_period_elapsed() {
        let time = MockTime::new();
        let runs = RefCell::new(heapless::Vec::<u64, 64>::new());
        let task = |_: TaskHandle| {
            let _ = runs.borrow_mut().push(time.now_us());
        };

        let scheduler = Scheduler::new(&time);
        scheduler.register("task", &task, 300).unwrap();

        for _ in 0..200 {
            scheduler.tick();
            time.advance(7);
        }

        let runs = runs.borrow();
        assert!(runs.len() > 1);
        for pair in runs.windows(2) {
            assert!(pair[1] - pair[0] >= 300, "ran at {} and {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_late_task_reschedules_from_actual_run() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let task = counter(&count);

        let scheduler = Scheduler::new(&time);
        let handle = scheduler.register("late", &task, 1000).unwrap();
        scheduler.tick();
        assert_eq!(scheduler.task_info(handle).unwrap().next_due_us, 1000);

        // Due since t=1000, nobody ticked until t=5000
        time.set(5000);
        for _ in 0..5 {
            scheduler.tick();
        }

        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.task_info(handle).unwrap().next_due_us, 6000);
    }

    #[test]
    fn test_due_check_across_clock_wrap() {
        let time = MockTime::with_initial(u64::MAX - 50);
        let count = Cell::new(0);
        let task = counter(&count);

        let scheduler = Scheduler::new(&time);
        let handle = scheduler.register("wrap", &task, 100).unwrap();

        scheduler.tick();
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.task_info(handle).unwrap().next_due_us, 49);

        // Clock has wrapped to 48, one microsecond short of the period
        time.advance(99);
        scheduler.tick();
        assert_eq!(count.get(), 1);

        time.advance(1);
        scheduler.tick();
        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.task_info(handle).unwrap().next_due_us, 149);
    }

    #[test]
    fn test_task_retiming_itself_runs_once_per_tick() {
        let time = MockTime::new();
        let runs = Cell::new(0);
        let scheduler = Scheduler::new(&time);

        let this: Cell<Option<&dyn Runnable>> = Cell::new(None);
        let retime = |handle: TaskHandle| {
            runs.set(runs.get() + 1);
            scheduler.unregister(handle).unwrap();
            if let Some(this) = this.get() {
                scheduler.register("retime", this, 5_000).unwrap();
            }
        };
        this.set(Some(&retime));
        scheduler.register("retime", &retime, 1_000).unwrap();

        scheduler.tick();

        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.stats().sweep_count, 1);
        let tasks = scheduler.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].1.period_us, 5_000);

        // The new registration is picked up by the next tick
        scheduler.tick();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_nested_tick_is_noop() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let other = counter(&count);

        let scheduler = Scheduler::new(&time);
        let nested_running = Cell::new(false);
        let reenter = |_: TaskHandle| {
            nested_running.set(scheduler.is_running());
            scheduler.tick();
            scheduler.tick();
        };
        scheduler.register("reenter", &reenter, 0).unwrap();
        scheduler.register("other", &other, 0).unwrap();

        scheduler.tick();

        assert!(nested_running.get());
        assert!(!scheduler.is_running());
        assert_eq!(count.get(), 1);
        let stats = scheduler.stats();
        assert_eq!(stats.sweep_count, 1);
        assert_eq!(stats.nested_tick_count, 2);
        assert_eq!(stats.run_count, 2);
    }

    #[test]
    fn test_unregister_stops_runs() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let task = counter(&count);

        let scheduler = Scheduler::new(&time);
        let handle = scheduler.register("task", &task, 100).unwrap();
        scheduler.tick();

        scheduler.unregister(handle).unwrap();
        time.advance(10_000);
        scheduler.tick();

        assert_eq!(count.get(), 1);
        assert!(!scheduler.is_registered(handle));
        assert_eq!(
            scheduler.unregister(handle),
            Err(SchedulerError::NotRegistered)
        );
    }

    #[test]
    fn test_callback_unregisters_itself() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let scheduler = Scheduler::new(&time);

        let once = |handle: TaskHandle| {
            count.set(count.get() + 1);
            scheduler.unregister(handle).unwrap();
        };
        scheduler.register("once", &once, 0).unwrap();

        scheduler.tick();
        scheduler.tick();

        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.task_count(), 0);
        assert_eq!(scheduler.stats().run_count, 1);
    }

    #[test]
    fn test_callback_unregisters_later_task() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let victim = counter(&count);
        let victim_handle = Cell::new(None);

        let scheduler = Scheduler::new(&time);
        let killer = |_: TaskHandle| {
            if let Some(handle) = victim_handle.take() {
                scheduler.unregister(handle).unwrap();
            }
        };
        scheduler.register("killer", &killer, 0).unwrap();
        victim_handle.set(Some(scheduler.register("victim", &victim, 0).unwrap()));

        scheduler.tick();

        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.task_count(), 1);
    }

    #[test]
    fn test_overrun_warns_once() {
        let time = MockTime::new();
        let slow = |_: TaskHandle| time.advance(1500);

        let scheduler =
            Scheduler::<_, 4>::with_params(&time, CyclicParams::with_default(1000));
        let handle = scheduler.register("slow", &slow, 0).unwrap();

        for _ in 0..10 {
            scheduler.tick();
        }

        let info = scheduler.task_info(handle).unwrap();
        assert!(info.stats.overrun_warned);
        assert_eq!(info.stats.run_count, 10);
        assert_eq!(info.stats.cpu_time_us, 15_000);
        assert_eq!(info.stats.max_execution_us, 1500);
        assert_eq!(scheduler.stats().overrun_count, 1);
        assert!(scheduler.is_registered(handle));
    }

    #[test]
    fn test_reregistration_resets_latch() {
        let time = MockTime::new();
        let slow = |_: TaskHandle| time.advance(2000);

        let scheduler =
            Scheduler::<_, 4>::with_params(&time, CyclicParams::with_default(1000));
        let first = scheduler.register("slow", &slow, 0).unwrap();
        scheduler.tick();
        assert!(scheduler.task_info(first).unwrap().stats.overrun_warned);

        scheduler.unregister(first).unwrap();
        let second = scheduler.register("slow", &slow, 0).unwrap();
        let info = scheduler.task_info(second).unwrap();
        assert!(!info.stats.overrun_warned);
        assert_eq!(info.stats.run_count, 0);

        scheduler.tick();
        assert_eq!(scheduler.stats().overrun_count, 2);
    }

    #[test]
    fn test_threshold_change_applies_next_tick() {
        let time = MockTime::new();
        let work = |_: TaskHandle| time.advance(300);

        let scheduler =
            Scheduler::<_, 4>::with_params(&time, CyclicParams::with_default(1000));
        let handle = scheduler.register("work", &work, 0).unwrap();

        scheduler.tick();
        assert!(!scheduler.task_info(handle).unwrap().stats.overrun_warned);

        assert_eq!(
            scheduler.on_param_change("cyclic_max_cpu_time", ParamOp::Overwrite, "200"),
            Ok(200)
        );
        scheduler.tick();
        assert!(scheduler.task_info(handle).unwrap().stats.overrun_warned);

        assert_eq!(
            scheduler.on_param_change("cyclic_max_cpu_time", ParamOp::Delete, ""),
            Ok(1000)
        );
        assert_eq!(scheduler.max_cpu_time_us(), 1000);
    }

    #[test]
    fn test_registry_full() {
        let time = MockTime::new();
        let task = |_: TaskHandle| {};
        let scheduler = Scheduler::<_, 2>::with_params(&time, CyclicParams::new());

        scheduler.register("a", &task, 10).unwrap();
        scheduler.register("b", &task, 10).unwrap();
        assert_eq!(
            scheduler.register("c", &task, 10),
            Err(SchedulerError::RegistryFull)
        );
        assert_eq!(scheduler.capacity(), 2);
    }

    #[test]
    fn test_unregister_all() {
        let time = MockTime::new();
        let count = Cell::new(0);
        let task = counter(&count);

        let scheduler = Scheduler::new(&time);
        for name in ["a", "b", "c"] {
            scheduler.register(name, &task, 0).unwrap();
        }

        assert_eq!(scheduler.unregister_all(), 3);
        scheduler.tick();
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.unregister_all(), 0);
    }

    #[test]
    fn test_tasks_snapshot_in_registration_order() {
        let time = MockTime::new();
        let task = |_: TaskHandle| {};
        let scheduler = Scheduler::new(&time);

        scheduler.register("first", &task, 10).unwrap();
        let middle = scheduler.register("middle", &task, 20).unwrap();
        scheduler.register("last", &task, 30).unwrap();
        scheduler.unregister(middle).unwrap();
        scheduler.register("again", &task, 40).unwrap();

        let names: heapless::Vec<&str, 8> =
            scheduler.tasks().iter().map(|(_, info)| info.name).collect();
        assert_eq!(names.as_slice(), &["first", "last", "again"]);
    }

    #[test]
    fn test_schedule_feeds_watchdog_without_tasks() {
        let time = MockTime::new();
        let watchdog = MockWatchdog::new();
        let scheduler = Scheduler::new(&time).with_watchdog(&watchdog);

        scheduler.schedule();
        scheduler.schedule();

        assert_eq!(watchdog.resets(), 2);
        assert_eq!(scheduler.stats().sweep_count, 2);
    }

    #[test]
    fn test_delay_runs_tasks_while_waiting() {
        let time = MockTime::new();
        let count = Cell::new(0);
        // Stands in for hardware time passing between polls
        let clock = |_: TaskHandle| time.advance(10);
        let blink = counter(&count);

        let scheduler = Scheduler::new(&time);
        scheduler.register("clock", &clock, 0).unwrap();
        scheduler.register("blink", &blink, 100).unwrap();

        scheduler.delay_us(1000);

        assert!(time.now_us() >= 1000);
        assert!((10..=11).contains(&count.get()), "ran {} times", count.get());
    }
}
