//! Mock time source with controllable time advancement

use crate::platform::traits::TimeSource;
use core::cell::Cell;

/// Mock time source for testing
///
/// Time only moves when the test calls [`advance`](MockTime::advance) or
/// [`set`](MockTime::set). Share it by reference (`&MockTime` is itself a
/// `TimeSource`) so task callbacks can simulate their own run time.
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time, wrapping at `u64::MAX`.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().wrapping_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
    }

    #[test]
    fn mock_time_advance_wraps() {
        let time = MockTime::with_initial(u64::MAX);
        time.advance(2);
        assert_eq!(time.now_us(), 1);
    }

    #[test]
    fn shared_reference_sees_updates() {
        let time = MockTime::new();
        let handle: &MockTime = &time;
        time.set(42);
        assert_eq!(TimeSource::now_us(&handle), 42);
    }
}
