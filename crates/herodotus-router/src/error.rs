//! Route table errors.

use thiserror::Error;

/// Errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A catch-all segment was followed by more segments.
    #[error("Wildcard segment '{segment}' must be the last segment of '{path}'")]
    WildcardNotLast {
        /// The offending pattern.
        path: String,
        /// The wildcard segment.
        segment: String,
    },

    /// Two different parameter names were declared at the same position.
    #[error("Parameter '{{{new}}}' in '{path}' conflicts with existing '{{{existing}}}'")]
    ParamConflict {
        /// The offending pattern.
        path: String,
        /// Parameter name already registered at this position.
        existing: String,
        /// Parameter name in the new pattern.
        new: String,
    },
}
