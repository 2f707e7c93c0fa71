//! Runtime parameters
//!
//! Named settings that an external configuration layer (environment,
//! console, persistent storage) changes at runtime. The configuration layer
//! reports every change as a [`ParamOp`] plus the raw string value; the
//! owning subsystem parses and applies it.

pub mod cyclic;
pub mod error;

pub use cyclic::{CyclicParams, DEFAULT_MAX_CPU_TIME_US, PARAM_MAX_CPU_TIME};
pub use error::ParameterError;

/// Kind of change reported by the configuration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamOp {
    /// Setting created for the first time
    Create,
    /// Existing setting overwritten
    Overwrite,
    /// Setting deleted
    Delete,
}

/// Parse a decimal `u32` setting value
///
/// Surrounding whitespace is ignored. Returns `None` for empty, signed,
/// non-numeric or out-of-range input.
pub fn parse_u32(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Parse u32 from string at compile time
///
/// Used for defaults exported by build.rs. Returns `fallback` on empty or
/// invalid input.
pub const fn const_parse_u32(s: &str, fallback: u32) -> u32 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return fallback;
    }

    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] < b'0' || bytes[i] > b'9' {
            return fallback;
        }
        value = value * 10 + (bytes[i] - b'0') as u64;
        if value > u32::MAX as u64 {
            return fallback;
        }
        i += 1;
    }
    value as u32
}
