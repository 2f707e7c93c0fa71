//! Parameter error types

/// Errors from applying a parameter change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// No parameter with this name is handled here
    NotFound,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::NotFound => write!(f, "unknown parameter"),
        }
    }
}
