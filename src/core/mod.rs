//! Core scheduler functionality
//!
//! This module contains the cyclic scheduler and the infrastructure it
//! depends on: logging macros and runtime configuration.

pub mod logging;
pub mod parameters;
pub mod scheduler;
