//! Cooperative cyclic task scheduler
//!
//! Subsystems register small callbacks to be run roughly every N
//! microseconds; the host drives them by calling the scheduler from its
//! wait and idle points. Timing is advisory: the scheduler never preempts,
//! only detects and reports tasks that overrun the configured budget.
//!
//! # Components
//!
//! - [`types`]: Core types (Runnable, TaskHandle, TaskInfo, SchedulerError)
//! - [`stats`]: Per-task and scheduler-wide accounting
//! - [`task`]: Timed execution of one callback
//! - [`cyclic`]: The scheduler context (registration, tick, schedule)
//! - [`monitor`]: Task listing for diagnostics
//!
//! # Example
//!
//! ```rust
//! use core::cell::Cell;
//! use cyclic_sched::core::scheduler::{Scheduler, TaskHandle};
//! use cyclic_sched::platform::mock::MockTime;
//!
//! let time = MockTime::new();
//! let kicks = Cell::new(0);
//! let kick = |_: TaskHandle| kicks.set(kicks.get() + 1);
//!
//! let scheduler = Scheduler::new(&time);
//! let handle = scheduler.register("wdt_kick", &kick, 500_000).unwrap();
//! scheduler.schedule();
//! scheduler.unregister(handle).unwrap();
//! assert_eq!(kicks.get(), 1);
//! ```

pub mod cyclic;
pub mod monitor;
mod registry;
pub mod stats;
pub mod task;
pub mod types;

pub use cyclic::Scheduler;
pub use monitor::report_tasks;
pub use stats::{SchedulerStats, TaskStats};
pub use types::{Runnable, SchedulerError, TaskHandle, TaskInfo, MAX_TASKS};
