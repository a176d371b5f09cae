//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub share: ShareConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8000)
    pub port: u16,
    /// Comma-separated list of origins allowed by CORS
    pub allowed_origins: String,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Allowed CORS origins, trimmed, empty entries dropped
    pub fn allowed_origins_list(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
    /// Seed demo inbox messages into an empty database
    #[serde(default = "default_seed_demo_messages")]
    pub seed_demo_messages: bool,
}

fn default_seed_demo_messages() -> bool {
    true
}

/// Remote classification model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Prediction endpoint; empty disables the remote classifier
    #[serde(default)]
    pub url: String,
    /// Upper bound for one remote call, in seconds
    pub timeout_seconds: f64,
}

impl ModelConfig {
    /// Remote endpoint if one is configured
    pub fn endpoint(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Share bridge configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    /// Seconds a shared payload stays retrievable
    pub ttl_seconds: u64,
    /// Maximum payloads held at once; the oldest is evicted beyond this
    pub max_entries: usize,
    /// Path the share submission redirects to (token appended as `?shared=`)
    pub redirect_path: String,
    /// Maximum accepted share submission size in bytes (shared files included)
    pub max_body_bytes: usize,
}

impl ShareConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> String {
        format!(
            "smishguard={},tower_http=debug",
            self.level.trim().to_ascii_lowercase()
        )
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (SMISHGUARD__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default(
                "server.allowed_origins",
                "http://localhost:5173,http://localhost:3000",
            )?
            .set_default("server.max_body_bytes", 64 * 1024)?
            .set_default("database.path", "./data/app.db")?
            .set_default("database.seed_demo_messages", true)?
            .set_default("model.url", "")?
            .set_default("model.timeout_seconds", 10.0)?
            .set_default("share.ttl_seconds", 600)?
            .set_default("share.max_entries", 10_000)?
            .set_default("share.redirect_path", "/")?
            .set_default("share.max_body_bytes", 10 * 1024 * 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SMISHGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub(crate) fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        if !self.model.timeout_seconds.is_finite() || self.model.timeout_seconds <= 0.0 {
            return Err(AppError::Config(
                "model.timeout_seconds must be a positive number".to_string(),
            ));
        }

        if let Some(endpoint) = self.model.endpoint() {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| AppError::Config(format!("model.url is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::Config(
                    "model.url must use http or https".to_string(),
                ));
            }
        }

        if self.share.ttl_seconds == 0 {
            return Err(AppError::Config(
                "share.ttl_seconds must be greater than 0".to_string(),
            ));
        }

        if self.share.max_entries == 0 {
            return Err(AppError::Config(
                "share.max_entries must be greater than 0".to_string(),
            ));
        }

        if self.server.max_body_bytes == 0 || self.share.max_body_bytes == 0 {
            return Err(AppError::Config(
                "server.max_body_bytes and share.max_body_bytes must be greater than 0"
                    .to_string(),
            ));
        }

        for origin in self.server.allowed_origins_list() {
            if axum::http::HeaderValue::from_str(&origin).is_err() {
                return Err(AppError::Config(format!(
                    "server.allowed_origins contains an invalid origin: {origin}"
                )));
            }
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LoggingConfig::LEVELS.contains(&level.as_str()) {
            return Err(AppError::Config(format!(
                "logging.level must be one of {}",
                LoggingConfig::LEVELS.join(", ")
            )));
        }

        let format = self.logging.format.trim().to_ascii_lowercase();
        if !matches!(format.as_str(), "pretty" | "json") {
            return Err(AppError::Config(
                "logging.format must be \"pretty\" or \"json\"".to_string(),
            ));
        }

        Ok(())
    }
}
