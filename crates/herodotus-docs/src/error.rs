//! Error types for the documentation crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced when the document is rendered or written.
///
/// Nothing that happens while observing traffic produces a `DocsError`;
/// only the final flush can fail.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize documentation: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to create the output directory or write the file.
    #[error("Failed to write documentation to '{}': {source}", path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl DocsError {
    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

/// Why the parameters of one middleware could not be resolved.
///
/// Resolution failures are never fatal: the extractor logs them and treats
/// the middleware as declaring nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No parameter source is registered under this type name.
    #[error("Middleware '{name}' is not registered")]
    Unregistered {
        /// Resolved type name.
        name: String,
    },

    /// A source exists but could not produce its declarations.
    #[error("Parameters of middleware '{name}' are unavailable: {reason}")]
    Unavailable {
        /// Resolved type name.
        name: String,
        /// Failure description.
        reason: String,
    },
}

impl ResolveError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::Serialization(_)));
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = DocsError::io(
            "/readonly/documentation.json",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().contains("/readonly/documentation.json"));
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::Unregistered {
            name: "throttle".to_string(),
        };
        assert_eq!(err.to_string(), "Middleware 'throttle' is not registered");

        let err = ResolveError::unavailable("auth", "guard not booted");
        assert!(err.to_string().contains("guard not booted"));
    }
}
