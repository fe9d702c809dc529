//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::domain::PasswordHasher;

/// Default store descriptor: a SQLite file next to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://fintech.db";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Store settings
    pub store: StoreConfig,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Password hashing scheme for new registrations
    pub password_hasher: PasswordHasher,

    /// Optional telemetry export
    pub telemetry: TelemetryConfig,
}

/// Store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool (networked backends only)
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

/// Telemetry export settings
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// OTLP endpoint; `None` disables export entirely
    pub endpoint: Option<String>,

    /// Service name attached to exported data
    pub service_name: String,
}

impl TelemetryConfig {
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this so that parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", &lookup, 10u32)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"));
        }

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", &lookup, 8000u16)?;

        let password_hasher = match lookup("PASSWORD_HASHER") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PASSWORD_HASHER"))?,
            None => PasswordHasher::default(),
        };

        let endpoint = lookup("TELEMETRY_ENDPOINT")
            .or_else(|| lookup("OTEL_EXPORTER_OTLP_ENDPOINT"))
            .filter(|v| !v.trim().is_empty());
        let service_name =
            lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| "fintech-api".to_string());

        Ok(Self {
            store: StoreConfig {
                database_url,
                max_connections,
            },
            host,
            port,
            password_hasher,
            telemetry: TelemetryConfig {
                endpoint,
                service_name,
            },
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
