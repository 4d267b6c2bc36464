//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file still yields a runnable configuration. CLI flags override
//! individual fields after loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for collections and state.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub server: ServerConfig,
    pub intervals: IntervalsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            intervals: IntervalsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS; absent means allow any.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntervalsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub athlete_id: Option<String>,
    pub api_key: Option<String>,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://intervals.icu".to_string(),
            athlete_id: None,
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        Url::parse(&self.intervals.base_url)
            .map_err(|e| ConfigError::Invalid(format!("intervals.base_url: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.server.port, 8080);
        assert!(!config.intervals.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/var/lib/workouts"

            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/workouts"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.intervals.base_url, "https://intervals.icu");
    }

    #[test]
    fn test_intervals_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [intervals]
            enabled = true
            athlete_id = "i12345"
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert!(config.intervals.enabled);
        assert_eq!(config.intervals.athlete_id.as_deref(), Some("i12345"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = AppConfig::default();
        config.intervals.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
    }
}
