//! Top-level configuration and its builder.

use herodotus_telemetry::logging::create_env_filter;
use herodotus_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use http::Uri;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, DocumentationConfig, InfoConfig, LogFormat, MiddlewareConfig, ServerEntry,
    TelemetryConfigSection,
};

/// Complete recorder configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use herodotus_config::HerodotusConfig;
///
/// let config = HerodotusConfig::default();
/// assert_eq!(config.documentation.output_path, "storage/documentation.json");
/// assert!(config.servers.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HerodotusConfig {
    /// Recording and output.
    #[serde(default)]
    pub documentation: DocumentationConfig,

    /// Document `info` block.
    #[serde(default)]
    pub info: InfoConfig,

    /// Document `servers` list.
    #[serde(default)]
    pub servers: Vec<ServerEntry>,

    /// Global middleware, aliases and groups.
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Logging and metrics.
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl HerodotusConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> HerodotusConfigBuilder {
        HerodotusConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - the output path or the title is empty
    /// - a server URL is not absolute
    /// - a group lists itself
    /// - the log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documentation.output_path.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "documentation.output_path",
                "must not be empty",
            ));
        }

        if self.info.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("info.title", "must not be empty"));
        }

        for (i, server) in self.servers.iter().enumerate() {
            let absolute = server
                .url
                .parse::<Uri>()
                .is_ok_and(|uri| uri.scheme().is_some() && uri.authority().is_some());
            if !absolute {
                return Err(ConfigError::invalid_value(
                    format!("servers[{i}].url"),
                    format!("expected an absolute URL, got '{}'", server.url),
                ));
            }
        }

        for (group, members) in &self.middleware.groups {
            if members.iter().any(|m| m == group) {
                return Err(ConfigError::invalid_value(
                    format!("middleware.groups.{group}"),
                    "group contains itself",
                ));
            }
        }

        if let Err(e) = create_env_filter(&self.telemetry.logging.level) {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                e.to_string(),
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs, indented output and header
    /// example capture.
    ///
    /// ```
    /// use herodotus_config::{HerodotusConfig, LogFormat};
    ///
    /// let config = HerodotusConfig::development();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    /// assert!(config.documentation.pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.documentation.pretty = true;
        config.documentation.capture_header_examples = true;

        config.telemetry.environment = "development".to_string();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;

        config
    }

    /// Production preset: JSON logs at info level and compact output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.environment = "production".to_string();
        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;

        config
    }

    /// Converts the telemetry section for `herodotus_telemetry::init_telemetry`.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let section = &self.telemetry;
        let logging = LogConfig {
            enabled: section.logging.enabled,
            level: section.logging.level.clone(),
            json_format: section.logging.format == LogFormat::Json,
            file_line_info: section.logging.include_location,
            ..LogConfig::default()
        };

        TelemetryConfig::builder()
            .service_name(&section.service_name)
            .service_version(&self.info.version)
            .environment(&section.environment)
            .metrics(MetricsConfig {
                enabled: section.metrics_enabled,
            })
            .logging(logging)
            .build()
    }
}

/// Builder for [`HerodotusConfig`].
#[derive(Debug, Default)]
pub struct HerodotusConfigBuilder {
    config: HerodotusConfig,
}

impl HerodotusConfigBuilder {
    /// Creates a builder starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the documentation section.
    #[must_use]
    pub fn documentation(mut self, documentation: DocumentationConfig) -> Self {
        self.config.documentation = documentation;
        self
    }

    /// Sets the info section.
    #[must_use]
    pub fn info(mut self, info: InfoConfig) -> Self {
        self.config.info = info;
        self
    }

    /// Appends a server entry.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        self.config.servers.push(ServerEntry {
            url: url.into(),
            description: description.into(),
        });
        self
    }

    /// Sets the middleware section.
    #[must_use]
    pub fn middleware(mut self, middleware: MiddlewareConfig) -> Self {
        self.config.middleware = middleware;
        self
    }

    /// Sets the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    /// Builds without validating.
    #[must_use]
    pub fn build(self) -> HerodotusConfig {
        self.config
    }

    /// Builds and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<HerodotusConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HerodotusConfig::default().validate().is_ok());
        assert!(HerodotusConfig::development().validate().is_ok());
        assert!(HerodotusConfig::production().validate().is_ok());
    }

    #[test]
    fn test_builder_sections() {
        let config = HerodotusConfig::builder()
            .info(InfoConfig {
                title: "Task API".to_string(),
                ..Default::default()
            })
            .server("http://localhost:8000", "Local")
            .documentation(DocumentationConfig {
                output_path: "docs/api.json".to_string(),
                ..Default::default()
            })
            .build();

        assert_eq!(config.info.title, "Task API");
        assert_eq!(config.servers[0].description, "Local");
        assert_eq!(config.documentation.output_path, "docs/api.json");
    }

    #[test]
    fn test_relative_server_url_rejected() {
        let err = HerodotusConfig::builder()
            .server("localhost", "")
            .build_validated()
            .unwrap_err();
        assert!(err.to_string().contains("servers[0].url"));
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let mut config = HerodotusConfig::default();
        config.documentation.output_path = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "documentation.output_path"
        ));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut config = HerodotusConfig::default();
        config.info.title = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_self_referencing_group_rejected() {
        let mut config = HerodotusConfig::default();
        config
            .middleware
            .groups
            .insert("api".to_string(), vec!["auth".to_string(), "api".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = HerodotusConfig::default();
        config.telemetry.logging.level = "herodotus=[".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "telemetry.logging.level"
        ));
    }

    #[test]
    fn test_telemetry_conversion() {
        let mut config = HerodotusConfig::development();
        config.telemetry.service_name = "task-api".to_string();
        config.telemetry.metrics_enabled = false;
        config.info.version = "2.1.0".to_string();

        let telemetry = config.telemetry_config();
        assert_eq!(telemetry.service_name, "task-api");
        assert_eq!(telemetry.service_version, "2.1.0");
        assert!(!telemetry.metrics.enabled);
        assert!(!telemetry.logging.json_format);
        assert!(telemetry.logging.file_line_info);
        assert_eq!(telemetry.logging.level, "debug");
        assert_eq!(telemetry.logging.service_name, "task-api");
    }

    #[test]
    fn test_unknown_top_level_section_rejected() {
        let result: Result<HerodotusConfig, _> = toml::from_str("[server]\nhttp_addr = \"x\"");
        assert!(result.is_err());
    }
}
