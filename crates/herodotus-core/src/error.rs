//! Error types for core descriptors.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing core descriptors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A parameter declaration is not usable as a header parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Declared parameter name.
        name: String,
        /// Why the declaration was rejected.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
