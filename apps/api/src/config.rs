//! API configuration module.
//!
//! Configuration is layered with the `config` crate:
//!
//! ```text
//! built-in defaults
//!       │
//!       ▼
//! TOML file ($MOBILIA_CONFIG, default ./mobilia.toml, optional)
//!       │
//!       ▼
//! MOBILIA_* environment variables (MOBILIA_PORT, MOBILIA_JWT_SECRET, ...)
//! ```

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "MOBILIA_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "mobilia.toml";
const MIN_SECRET_LEN: usize = 16;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// HMAC secret for signing bearer tokens
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Base URL used in confirmation links
    pub public_base_url: String,

    /// Per-request timeout; 0 disables it
    pub request_timeout_secs: u64,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,

    /// Admin account created at startup if missing
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: "./mobilia.db".to_string(),
            max_connections: 8,
            // In production this MUST be overridden via MOBILIA_JWT_SECRET
            jwt_secret: "mobilia-dev-secret-change-in-production".to_string(),
            jwt_lifetime_secs: 86_400,
            public_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `$MOBILIA_CONFIG` (or `mobilia.toml`) and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Loads configuration from a specific file (missing is fine) and the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&ApiConfig::default())?)
            .add_source(
                File::new(&path.to_string_lossy(), FileFormat::Toml).required(false),
            )
            .add_source(Environment::with_prefix("MOBILIA"))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail at first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "jwt_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt_lifetime_secs must be positive".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be positive".to_string(),
            ));
        }

        if self.bootstrap_admin_email.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(ConfigError::MissingRequired(
                "bootstrap_admin_email and bootstrap_admin_password must be set together"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
