//! Facade error type.

use herodotus_config::ConfigError;
use herodotus_docs::DocsError;
use herodotus_telemetry::TelemetryError;
use thiserror::Error;

/// Errors surfaced while setting up or flushing a [`Recorder`](crate::Recorder).
#[derive(Debug, Error)]
pub enum HerodotusError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// The document could not be written.
    #[error(transparent)]
    Docs(#[from] DocsError),
}

/// Result type for facade operations.
pub type HerodotusResult<T> = Result<T, HerodotusError>;
