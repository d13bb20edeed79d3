//! Observability helpers for Herodotus.
//!
//! The recorder itself is quiet bookkeeping, but operators still want to know
//! how much traffic was documented and whether the final document made it to
//! disk. This crate provides:
//!
//! - **Logging**: `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: counters recorded through the `metrics` facade
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `herodotus_observations_total` | Counter | `outcome` | Observed request/response cycles |
//! | `herodotus_examples_total` | Counter | `form` | Examples merged into content entries |
//! | `herodotus_flushes_total` | Counter | `outcome` | Document flush attempts |
//!
//! No exporter is bundled. Hosts that already run a Prometheus or StatsD
//! recorder get these counters for free; without a recorder the calls are
//! no-ops.
//!
//! # Example
//!
//! ```rust,ignore
//! use herodotus_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("task-api")
//!     .build();
//!
//! init_telemetry(&config)?;
//! tracing::info!("documentation recorder ready");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{describe_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and registers metric descriptions.
///
/// Logging is installed first so that anything logged while describing
/// metrics is already captured.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the subscriber cannot be installed
/// (for example because another global subscriber is already set).
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;

    if config.metrics.enabled {
        describe_metrics();
    }

    Ok(())
}
