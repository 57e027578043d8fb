//! Store API configuration module.
//!
//! Configuration is layered, lowest to highest priority:
//!
//! ```text
//! serde defaults ──► store-api.toml (optional) ──► environment (+ .env)
//! ```
//!
//! Keys match the environment variable names, lowercased:
//! `PORT`, `BASE_URL`, `DB_CONN`, `DB_MAX_OPEN_CONNECTION`.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Name (without extension) of the optional configuration file.
pub const CONFIG_FILE: &str = "store-api";

/// Store API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host/interface to bind
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// SQLite database file path
    #[serde(default = "default_db_conn")]
    pub db_conn: String,

    /// Maximum pooled database connections
    #[serde(default = "default_db_max_open_connection")]
    pub db_max_open_connection: u32,
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "0.0.0.0".to_string()
}

fn default_db_conn() -> String {
    "store.db".to_string()
}

fn default_db_max_open_connection() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: default_port(),
            base_url: default_base_url(),
            db_conn: default_db_conn(),
            db_max_open_connection: default_db_max_open_connection(),
        }
    }
}

impl ApiConfig {
    /// Loads `.env`, then `store-api.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::DotEnv(e.to_string()));
            }
        }

        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_settings(settings)
    }

    /// Builds a configuration from TOML text alone.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("PORT".to_string()));
        }
        if self.db_max_open_connection == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_OPEN_CONNECTION".to_string(),
            ));
        }
        if self.db_conn.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DB_CONN".to_string()));
        }
        Ok(())
    }

    /// Address string for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.base_url, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read .env file: {0}")]
    DotEnv(String),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = ApiConfig::from_toml_str("").unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_values_from_toml() {
        let config = ApiConfig::from_toml_str(
            r#"
            port = 9090
            base_url = "127.0.0.1"
            db_conn = "/var/lib/store/store.db"
            db_max_open_connection = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.db_conn, "/var/lib/store/store.db");
        assert_eq!(config.db_max_open_connection, 10);
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ApiConfig::from_toml_str("port = 0"),
            Err(ConfigError::InvalidValue(ref key)) if key == "PORT"
        ));
        assert!(matches!(
            ApiConfig::from_toml_str("db_max_open_connection = 0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ApiConfig::from_toml_str("db_conn = \"  \""),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        assert!(matches!(
            ApiConfig::from_toml_str("port = \"eighty\""),
            Err(ConfigError::Load(_))
        ));
    }
}
