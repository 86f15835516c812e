//! Configuration loading and validation for the field encryption service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use axum::http::HeaderName;
use fieldcrypt::EncodedKey;
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Hex or base64 encoding of the 32-byte field encryption key. **Required.**
    pub encryption_key: EncodedKey,

    /// YAML file mapping entity types to sensitive fields. Built-in table when unset.
    #[serde(default)]
    pub field_schema_path: Option<String>,

    /// HTTP header carrying the entity type of a record request.
    #[serde(default = "default_entity_header")]
    pub entity_header_name: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// OTLP endpoint for trace export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_entity_header() -> String {
    "X-Entity-Type".into()
}
fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    /// Load and validate configuration from a specific environment source.
    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is ENCRYPTION_KEY set?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Schema file path, treating an empty value as unset.
    pub fn schema_path(&self) -> Option<&str> {
        self.field_schema_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// OTLP endpoint, treating an empty value as unset.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        HeaderName::from_bytes(self.entity_header_name.as_bytes())
            .with_context(|| format!("ENTITY_HEADER_NAME `{}` is not a valid header name", self.entity_header_name))?;

        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    fn valid() -> Config {
        Config {
            encryption_key: EncodedKey::new("00".repeat(32)),
            field_schema_path: None,
            entity_header_name: default_entity_header(),
            listen_port: default_listen_port(),
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_entity_header(), "X-Entity-Type");
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_header_name() {
        let cfg = Config {
            entity_header_name: "not a header".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_optional_paths_are_unset() {
        let cfg = Config {
            field_schema_path: Some("  ".into()),
            otel_exporter_otlp_endpoint: Some(String::new()),
            ..valid()
        };
        assert_eq!(cfg.schema_path(), None);
        assert_eq!(cfg.otlp_endpoint(), None);
    }

    #[test]
    fn debug_never_prints_key() {
        let cfg = Config {
            encryption_key: EncodedKey::new("ab".repeat(32)),
            ..valid()
        };
        assert!(!format!("{cfg:?}").contains(&"ab".repeat(32)));
    }

    #[test]
    fn missing_encryption_key_is_fatal() {
        let err = Config::from_environment(env_with(&[("LOG_LEVEL", "debug")])).unwrap_err();
        assert!(format!("{err:#}").contains("ENCRYPTION_KEY"));
    }

    #[test]
    fn loads_with_encryption_key_and_defaults() {
        let key = "11".repeat(32);
        let cfg = Config::from_environment(env_with(&[("ENCRYPTION_KEY", key.as_str())])).unwrap();
        assert_eq!(cfg.entity_header_name, "X-Entity-Type");
        assert_eq!(cfg.listen_port, 8080);
        assert_eq!(cfg.schema_path(), None);
        assert!(fieldcrypt::KeyManager::from_encoded(&cfg.encryption_key).is_ok());
    }
}
