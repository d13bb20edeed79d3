//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, HerodotusConfig, LogFormat, ServerEntry};

/// Loads configuration from defaults, a file and the environment.
///
/// Later layers override earlier ones:
/// 1. Defaults or a preset
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use herodotus_config::ConfigLoader;
///
/// # fn main() -> Result<(), herodotus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()?
///     .with_optional_file("herodotus.toml")?
///     .with_env_prefix("HERODOTUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HerodotusConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HerodotusConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HerodotusConfig::default();
        self
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = HerodotusConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = HerodotusConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file, chosen by extension.
    ///
    /// Sections missing from the file take their default values; a file
    /// replaces whatever the loader held before.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unreadable, has an
    /// unsupported extension, fails to parse, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.config = parse(&content, extension)?;

        Ok(self)
    }

    /// Like [`Self::with_file`], but a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or
    /// `json`).
    ///
    /// ```
    /// use herodotus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[info]\ntitle = \"Task API\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.info.title, "Task API");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables overrides from `PREFIX__SECTION__KEY` variables.
    ///
    /// With prefix `HERODOTUS`:
    /// - `HERODOTUS__DOCUMENTATION__OUTPUT_PATH=/var/lib/api/doc.json`
    /// - `HERODOTUS__INFO__TITLE=Task API`
    /// - `HERODOTUS__SERVERS__0__URL=https://api.example.com`
    /// - `HERODOTUS__MIDDLEWARE__GLOBAL=throttle,auth`
    /// - `HERODOTUS__MIDDLEWARE__GROUPS__API=auth,throttle`
    /// - `HERODOTUS__TELEMETRY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file from the working directory if there is one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<HerodotusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> HerodotusConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.apply_env_vars(env::vars(), prefix)
    }

    fn apply_env_vars<I>(&mut self, vars: I, prefix: &str) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        // SERVERS__2 must be applied before SERVERS__10.
        vars.sort_by(|(a, _), (b, _)| env_key_order(a).cmp(&env_key_order(b)));

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // Another variable that merely shares the prefix.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["DOCUMENTATION", "ENABLED"] => {
                config.documentation.enabled = bool_var(key, value)?;
            }
            ["DOCUMENTATION", "OUTPUT_PATH"] => {
                config.documentation.output_path = value.to_string();
            }
            ["DOCUMENTATION", "PRETTY"] => {
                config.documentation.pretty = bool_var(key, value)?;
            }
            ["DOCUMENTATION", "CAPTURE_HEADER_EXAMPLES"] => {
                config.documentation.capture_header_examples = bool_var(key, value)?;
            }

            ["INFO", "TITLE"] => config.info.title = value.to_string(),
            ["INFO", "VERSION"] => config.info.version = value.to_string(),
            ["INFO", "CONTACT_NAME"] => config.info.contact_name = optional(value),
            ["INFO", "CONTACT_EMAIL"] => config.info.contact_email = optional(value),

            ["SERVERS", index, field] => {
                let index: usize = index
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected a server index"))?;
                let servers = &mut config.servers;
                if index == servers.len() {
                    servers.push(ServerEntry {
                        url: String::new(),
                        description: String::new(),
                    });
                }
                let server = servers.get_mut(index).ok_or_else(|| {
                    ConfigError::env_parse_error(key, "server indices must be contiguous")
                })?;
                match *field {
                    "URL" => server.url = value.to_string(),
                    "DESCRIPTION" => server.description = value.to_string(),
                    _ => {}
                }
            }

            ["MIDDLEWARE", "GLOBAL"] => config.middleware.global = list(value),
            ["MIDDLEWARE", "ALIASES", name] => {
                config
                    .middleware
                    .aliases
                    .insert(name.to_lowercase(), value.to_string());
            }
            ["MIDDLEWARE", "GROUPS", name] => {
                config.middleware.groups.insert(name.to_lowercase(), list(value));
            }

            ["TELEMETRY", "SERVICE_NAME"] => config.telemetry.service_name = value.to_string(),
            ["TELEMETRY", "ENVIRONMENT"] => config.telemetry.environment = value.to_string(),
            ["TELEMETRY", "METRICS_ENABLED"] => {
                config.telemetry.metrics_enabled = bool_var(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                config.telemetry.logging.enabled = bool_var(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                config.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                config.telemetry.logging.include_location = bool_var(key, value)?;
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Sort key comparing numeric segments by value.
fn env_key_order(key: &str) -> Vec<(Option<usize>, &str)> {
    key.split("__")
        .map(|segment| (segment.parse().ok(), segment))
        .collect()
}

fn parse(content: &str, format: &str) -> Result<HerodotusConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::unsupported_format(format)),
    }
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, HerodotusConfig::default());
    }

    #[test]
    fn test_loader_presets() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.telemetry.logging.level, "debug");

        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
        assert!(!config.documentation.pretty);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [documentation]
            output_path = "docs/api.json"
            pretty = true

            [info]
            title = "Task API"
            contact_name = "Platform Team"
            contact_email = "platform@example.com"

            [[servers]]
            url = "http://localhost:8000"
            description = "Local"

            [middleware]
            global = ["throttle"]

            [middleware.aliases]
            auth = "app::Authenticate"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.documentation.output_path, "docs/api.json");
        assert!(config.documentation.pretty);
        assert_eq!(config.info.contact_name.as_deref(), Some("Platform Team"));
        assert_eq!(config.servers[0].url, "http://localhost:8000");
        assert_eq!(config.middleware.aliases["auth"], "app::Authenticate");
        assert_eq!(config.telemetry, crate::TelemetryConfigSection::default());
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"info": {"title": "Task API"}, "servers": [{"url": "https://api.example.com"}]}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.info.title, "Task API");
        assert_eq!(config.servers.len(), 1);
    }

    #[test]
    fn test_loader_unknown_format() {
        let err = ConfigLoader::new().with_string("", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_loader_unknown_field() {
        let err = ConfigLoader::new()
            .with_string("[documentation]\noutput = \"x\"", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_loader_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herodotus.json");
        fs::write(&path, r#"{"documentation": {"capture_header_examples": true}}"#).unwrap();

        let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
        assert!(config.documentation.capture_header_examples);
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/herodotus.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/herodotus.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, HerodotusConfig::default());
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new()
            .with_string("[[servers]]\nurl = \"/relative\"", "toml")
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[info]\ntitle = \"\"", "toml")
            .unwrap()
            .load_unvalidated();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Process environment is shared between tests, so overrides are applied
    // through apply_env_var directly.

    #[test]
    fn test_apply_env_var_documentation() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__DOCUMENTATION__OUTPUT_PATH", "/tmp/doc.json", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DOCUMENTATION__PRETTY", "yes", "TEST")
            .unwrap();
        assert_eq!(loader.config.documentation.output_path, "/tmp/doc.json");
        assert!(loader.config.documentation.pretty);
    }

    #[test]
    fn test_apply_env_var_servers() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SERVERS__0__URL", "https://api.example.com", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__SERVERS__0__DESCRIPTION", "Production", "TEST")
            .unwrap();
        assert_eq!(loader.config.servers.len(), 1);
        assert_eq!(loader.config.servers[0].description, "Production");

        let gap = loader.apply_env_var("TEST__SERVERS__5__URL", "https://x", "TEST");
        assert!(matches!(gap, Err(ConfigError::EnvParseError { .. })));
    }

    #[test]
    fn test_env_servers_applied_in_numeric_order() {
        let vars = (0..12).rev().map(|i| {
            (
                format!("TEST__SERVERS__{i}__URL"),
                format!("https://node-{i}.example.com"),
            )
        });

        let mut loader = ConfigLoader::new();
        loader.apply_env_vars(vars, "TEST").unwrap();

        let servers = &loader.config.servers;
        assert_eq!(servers.len(), 12);
        assert_eq!(servers[1].url, "https://node-1.example.com");
        assert_eq!(servers[10].url, "https://node-10.example.com");
        assert_eq!(servers[11].url, "https://node-11.example.com");
    }

    #[test]
    fn test_env_key_order() {
        let mut keys = vec!["P__SERVERS__10__URL", "P__SERVERS__2__URL", "P__INFO__TITLE"];
        keys.sort_by_key(|k| env_key_order(k));
        assert_eq!(
            keys,
            vec!["P__INFO__TITLE", "P__SERVERS__2__URL", "P__SERVERS__10__URL"]
        );
    }

    #[test]
    fn test_apply_env_var_middleware() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__MIDDLEWARE__GLOBAL", "throttle, auth", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__MIDDLEWARE__GROUPS__API", "auth,throttle", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__MIDDLEWARE__ALIASES__AUTH", "app::Authenticate", "TEST")
            .unwrap();

        let middleware = &loader.config.middleware;
        assert_eq!(middleware.global, vec!["throttle", "auth"]);
        assert_eq!(middleware.groups["api"], vec!["auth", "throttle"]);
        assert_eq!(middleware.aliases["auth"], "app::Authenticate");
    }

    #[test]
    fn test_apply_env_var_telemetry() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__TELEMETRY__SERVICE_NAME", "task-api", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__TELEMETRY__LOGGING__FORMAT", "PRETTY", "TEST")
            .unwrap();
        assert_eq!(loader.config.telemetry.service_name, "task-api");
        assert_eq!(loader.config.telemetry.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader
            .apply_env_var("TEST__DOCUMENTATION__ENABLED", "sometimes", "TEST")
            .is_err());
        assert!(loader
            .apply_env_var("TEST__TELEMETRY__LOGGING__FORMAT", "xml", "TEST")
            .is_err());
    }

    #[test]
    fn test_apply_env_var_ignores_unrelated() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TESTING_MODE", "1", "TEST").unwrap();
        loader.apply_env_var("TEST__UNKNOWN__KEY", "1", "TEST").unwrap();
        assert_eq!(loader.config, HerodotusConfig::default());
    }
}
