#![cfg_attr(not(test), no_std)]

//! cyclic_sched - Cooperative periodic task scheduler
//!
//! Runs short callbacks at a requested minimum interval on a single
//! thread of control, without preemption. The host calls the scheduler
//! from its wait and idle points; tasks that exceed the configured CPU
//! budget are reported once per registration.

// Platform abstraction layer (clock, GPIO, watchdog)
pub mod platform;

// Core systems (logging, configuration, scheduler)
pub mod core;

// Device drivers using the scheduler
pub mod devices;
