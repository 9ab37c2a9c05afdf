//! Application configuration
//!
//! Read from a TOML file, `$SMART_FARM_CONFIG` or
//! `<config_dir>/smart-farm/config.toml`. Every field has a default, so a
//! partial file is valid. A handful of environment variables override the
//! file (see [`AppConfig::apply_env_overrides`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SMART_FARM_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub ml_service: MlServiceConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight work on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Users and admins.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// State-crop map. Shares `url` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            map_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlServiceConfig {
    #[serde(default = "default_ml_base_url")]
    pub base_url: String,
    /// Per-request timeout. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for MlServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_ml_base_url(),
            timeout_secs: None,
        }
    }
}

impl MlServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Admin account created on first start when the admin store is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,
    #[serde(default = "default_admin_password")]
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            password: default_admin_password(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `fmt` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_database_url() -> String {
    "sqlite://./smart-farm.db?mode=rwc".to_string()
}

fn default_ml_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_admin_email() -> String {
    "admin@gmail.com".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "fmt".to_string()
}

impl AppConfig {
    /// Read and parse `path`. Environment overrides are not applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }
        if !self.ml_service.base_url.starts_with("http://")
            && !self.ml_service.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "ml_service.base_url must be an http(s) URL, got '{}'",
                self.ml_service.base_url
            )));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "fmt" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'fmt' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Apply `PORT`, `DATABASE_URL`, `MAP_DATABASE_URL`, `ML_SERVICE_URL`
    /// and `LOG_LEVEL` from the process environment.
    pub fn apply_env(&mut self) -> Vec<&'static str> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; returns the keys that were applied.
    /// Unparseable or empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
            applied.push("PORT");
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
            applied.push("DATABASE_URL");
        }
        if let Some(url) = get("MAP_DATABASE_URL") {
            self.database.map_url = Some(url);
            applied.push("MAP_DATABASE_URL");
        }
        if let Some(url) = get("ML_SERVICE_URL") {
            self.ml_service.base_url = url;
            applied.push("ML_SERVICE_URL");
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
            applied.push("LOG_LEVEL");
        }

        applied
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `$SMART_FARM_CONFIG`, else `<config_dir>/smart-farm/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smart-farm")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.ml_service.base_url, "http://127.0.0.1:8000");
        assert!(cfg.ml_service.timeout().is_none());
        assert!(cfg.database.map_url.is_none());
        assert_eq!(cfg.admin.email, "admin@gmail.com");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [ml_service]
            base_url = "http://ml:9000/"
            timeout_secs = 15

            [database]
            map_url = "sqlite://./map.db?mode=rwc"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.ml_service.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(cfg.database.url, "sqlite://./smart-farm.db?mode=rwc");
        assert_eq!(cfg.database.map_url.as_deref(), Some("sqlite://./map.db?mode=rwc"));
    }

    #[test]
    fn rejects_non_http_ml_url_and_unknown_log_format() {
        assert!(matches!(
            AppConfig::from_toml("[ml_service]\nbase_url = \"ml:8000\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[logging]\nformat = \"xml\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("server = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("PORT", "7000"),
            ("ML_SERVICE_URL", "http://ml.internal"),
            ("LOG_LEVEL", ""),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        let applied = cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(applied, vec!["PORT", "ML_SERVICE_URL"]);
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.ml_service.base_url, "http://ml.internal");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn bad_port_override_is_ignored() {
        let mut cfg = AppConfig::default();
        let applied = cfg.apply_env_overrides(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(applied.is_empty());
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/smart-farm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
