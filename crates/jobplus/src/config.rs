//! Configuration loading from file and environment variables.

use jobplus_db::DbRuntimeSettings;
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "jobplus_models=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_db_path() -> String {
    "jobplus.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl DatabaseConfig {
    /// The pool tunables carried by this configuration.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `JOBPLUS_DB_PATH` overrides `database.path`
/// - `JOBPLUS_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `JOBPLUS_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `JOBPLUS_LOG_LEVEL` overrides `logging.level`
/// - `JOBPLUS_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

fn apply_env_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(db_path) = var("JOBPLUS_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(timeout) = var("JOBPLUS_DB_BUSY_TIMEOUT_MS") {
        if let Ok(parsed) = timeout.parse() {
            config.database.busy_timeout_ms = parsed;
        }
    }
    if let Some(size) = var("JOBPLUS_DB_POOL_MAX_SIZE") {
        if let Ok(parsed) = size.parse() {
            config.database.pool_max_size = parsed;
        }
    }
    if let Some(level) = var("JOBPLUS_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("JOBPLUS_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = apply_env_overrides(Config::default(), env(&[]));
        assert_eq!(config.database.path, "jobplus.db");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/jobplus/data.db"
            "#,
        )
        .expect("should parse");

        assert_eq!(config.database.path, "/var/lib/jobplus/data.db");
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                ("JOBPLUS_DB_PATH", "override.db"),
                ("JOBPLUS_DB_POOL_MAX_SIZE", "2"),
                ("JOBPLUS_LOG_LEVEL", "debug"),
                ("JOBPLUS_LOG_JSON", "1"),
            ]),
        );

        assert_eq!(config.database.path, "override.db");
        assert_eq!(config.database.pool_max_size, 2);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn unparseable_numeric_override_is_ignored() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[("JOBPLUS_DB_BUSY_TIMEOUT_MS", "soon")]),
        );
        assert_eq!(config.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn runtime_settings_follow_config() {
        let db = DatabaseConfig {
            busy_timeout_ms: 100,
            pool_max_size: 1,
            ..DatabaseConfig::default()
        };
        assert_eq!(
            db.runtime_settings(),
            DbRuntimeSettings {
                busy_timeout_ms: 100,
                pool_max_size: 1,
            }
        );
    }
}
