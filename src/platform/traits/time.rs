//! Monotonic time source
//!
//! The scheduler reads time through this trait so the same code runs
//! against a hardware timer on target and against [`MockTime`] on the host.
//!
//! [`MockTime`]: crate::platform::mock::MockTime

/// Platform monotonic microsecond clock
///
/// Timestamps are free-running and may wrap; compare them with
/// [`time_after_eq`] rather than `>=`.
///
/// # Example
///
/// ```
/// use cyclic_sched::platform::{time_after_eq, TimeSource};
///
/// fn poll<T: TimeSource>(time: &T, next_due: &mut u64) -> bool {
///     let now = time.now_us();
///     if time_after_eq(now, *next_due) {
///         *next_due = now + 20_000;
///         return true;
///     }
///     false
/// }
/// # struct Fixed;
/// # impl TimeSource for Fixed { fn now_us(&self) -> u64 { 5 } }
/// # let mut due = 0;
/// # assert!(poll(&Fixed, &mut due));
/// ```
pub trait TimeSource {
    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().wrapping_sub(reference_us)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Wraparound-safe `a >= b` for free-running microsecond timestamps
///
/// Correct as long as the two instants are less than 2^63 us apart.
#[inline]
pub const fn time_after_eq(a: u64, b: u64) -> bool {
    (a.wrapping_sub(b) as i64) >= 0
}
