//! Typed configuration for the Herodotus documentation recorder.
//!
//! - TOML and JSON files, chosen by extension
//! - `PREFIX__SECTION__KEY` environment overrides and optional `.env` files
//! - Strict parsing: unknown fields are rejected
//! - Layering: defaults or preset → file → environment
//!
//! # Example
//!
//! ```no_run
//! use herodotus_config::ConfigLoader;
//!
//! # fn main() -> Result<(), herodotus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("herodotus.toml")?
//!     .with_env_prefix("HERODOTUS")
//!     .load()?;
//!
//! println!("Documentation goes to {}", config.documentation.output_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [documentation]
//! output_path = "storage/documentation.json"
//! pretty = false
//! capture_header_examples = false
//!
//! [info]
//! title = "Task API"
//! version = "1.0.0"
//! contact_name = "Platform Team"
//! contact_email = "platform@example.com"
//!
//! [[servers]]
//! url = "https://api.example.com"
//! description = "Production"
//!
//! [middleware]
//! global = ["throttle"]
//!
//! [middleware.aliases]
//! auth = "app::Authenticate"
//!
//! [middleware.groups]
//! api = ["auth", "throttle"]
//!
//! [telemetry]
//! service_name = "task-api"
//! environment = "production"
//! metrics_enabled = true
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;

/// Environment prefix used by the recorder facade.
pub const ENV_PREFIX: &str = "HERODOTUS";
