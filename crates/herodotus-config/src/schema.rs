//! Configuration schema types.
//!
//! Every section rejects unknown keys and fills missing ones from the free
//! `default_*` functions below, so a partial file is always valid input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recording and output settings.
///
/// # Example
///
/// ```
/// use herodotus_config::DocumentationConfig;
///
/// let config = DocumentationConfig::default();
/// assert_eq!(config.output_path, "storage/documentation.json");
/// assert!(!config.capture_header_examples);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocumentationConfig {
    /// Whether traffic is recorded at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Where the document is written at shutdown.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Indent the written JSON.
    #[serde(default)]
    pub pretty: bool,

    /// Fill unmasked header parameter examples from observed requests.
    #[serde(default)]
    pub capture_header_examples: bool,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            output_path: default_output_path(),
            pretty: false,
            capture_header_examples: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> String {
    "storage/documentation.json".to_string()
}

/// The `info` block of the generated document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InfoConfig {
    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version. Defaults to the recorder's crate version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Contact name.
    #[serde(default)]
    pub contact_name: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            contact_name: None,
            contact_email: None,
        }
    }
}

fn default_title() -> String {
    "API Documentation".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// One entry of the document's `servers` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerEntry {
    /// Absolute server URL.
    pub url: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Middleware names used for parameter extraction.
///
/// ```toml
/// [middleware]
/// global = ["throttle"]
///
/// [middleware.aliases]
/// auth = "app::Authenticate"
///
/// [middleware.groups]
/// api = ["auth", "throttle"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MiddlewareConfig {
    /// Middleware applied to every route.
    #[serde(default)]
    pub global: Vec<String>,

    /// Short name to type name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Group name to member names.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a subscriber at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `herodotus_docs=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name attached to log lines.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Describe the recorder's counters to the installed metrics recorder.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "herodotus".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_defaults() {
        let config: DocumentationConfig = toml::from_str("").unwrap();
        assert_eq!(config, DocumentationConfig::default());
        assert!(config.enabled);
    }

    #[test]
    fn test_info_defaults_to_crate_version() {
        let config = InfoConfig::default();
        assert_eq!(config.title, "API Documentation");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_server_description_optional() {
        let entry: ServerEntry = toml::from_str(r#"url = "http://localhost:8000""#).unwrap();
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_middleware_tables() {
        let config: MiddlewareConfig = toml::from_str(
            r#"
            global = ["throttle"]

            [aliases]
            auth = "app::Authenticate"

            [groups]
            api = ["auth", "throttle"]
            "#,
        )
        .unwrap();

        assert_eq!(config.global, vec!["throttle"]);
        assert_eq!(config.aliases["auth"], "app::Authenticate");
        assert_eq!(config.groups["api"], vec!["auth", "throttle"]);
    }

    #[test]
    fn test_log_format_lowercase() {
        let config: LoggingConfig = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_logging_field_rejected() {
        let result: Result<LoggingConfig, _> = toml::from_str(r#"colour = true"#);
        assert!(result.is_err());
    }
}
