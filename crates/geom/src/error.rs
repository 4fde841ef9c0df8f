use std::fmt;

/// Errors raised when constructing geometry from untrusted values.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A length that must be non-negative was negative.
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A length was NaN or infinite.
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { field, value } => write!(f, "{field} must be >= 0, got {value}"),
            Self::NotFinite { field } => write!(f, "{field} must be finite"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that a length is finite and non-negative.
pub(crate) fn check_length(field: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        Err(Error::NotFinite { field })
    } else if value < 0.0 {
        Err(Error::Negative { field, value })
    } else {
        Ok(value)
    }
}
