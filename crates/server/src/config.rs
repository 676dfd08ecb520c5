//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STREETS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STREETS_HOST` - Bind address (default: 0.0.0.0)
//! - `STREETS_PORT` - Listen port (default: 5001, falls back to `PORT`)
//! - `STREETS_SCHEMA` - Schema holding the collection (default: tankstellen)
//! - `STREETS_COLLECTION` - Collection table name (default: streets)
//! - `STREETS_TLS_CERT` / `STREETS_TLS_KEY` - PEM certificate chain and key, set together
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use crate::db::{Collection, CollectionError};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Street server configuration.
///
/// One parameterised server covers every deployment variant: the schema
/// and collection names, TLS mode and port are all plain options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Schema and table holding the street records
    pub collection: Collection,
    /// HTTPS certificate and key; plain HTTP when absent
    pub tls: Option<TlsConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// TLS certificate configuration.
///
/// Implements `Debug` manually to redact the private key.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env(vars, "STREETS_TLS_CERT");
        let key_pem = get_optional_env(vars, "STREETS_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "STREETS_TLS_*".to_string(),
                "Both STREETS_TLS_CERT and STREETS_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the connection string is missing or any
    /// variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the connection string is missing or any
    /// variable has an invalid value.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(&vars, "STREETS_DATABASE_URL")?;
        let host = get_env_or_default(&vars, "STREETS_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STREETS_HOST".to_string(), e.to_string()))?;
        let port = get_port(&vars)?;

        let schema = get_env_or_default(&vars, "STREETS_SCHEMA", Collection::DEFAULT_SCHEMA);
        let table = get_env_or_default(&vars, "STREETS_COLLECTION", Collection::DEFAULT_TABLE);
        let collection = Collection::new(&schema, &table).map_err(|e| {
            let key = match e {
                CollectionError::InvalidSchema(_) => "STREETS_SCHEMA",
                CollectionError::InvalidTable(_) => "STREETS_COLLECTION",
            };
            ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
        })?;

        let tls = TlsConfig::from_vars(&vars)?;
        let sentry_dsn = get_optional_env(&vars, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&vars, "SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            collection,
            tls,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    vars: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    get_optional_env(vars, primary_key)
        .or_else(|| get_optional_env(vars, "DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get the listen port, honouring the platform-provided `PORT`.
fn get_port(vars: &impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
    let (key, value) = get_optional_env(vars, "STREETS_PORT")
        .map(|v| ("STREETS_PORT", v))
        .or_else(|| get_optional_env(vars, "PORT").map(|v| ("PORT", v)))
        .unwrap_or(("STREETS_PORT", "5001".to_string()));

    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).filter(|value| !value.trim().is_empty())
}

/// Whether `LOG_FORMAT` asks for JSON logs.
///
/// Read on its own, before [`ServerConfig`] loads, so that configuration
/// errors are already logged in the requested format.
#[must_use]
pub fn json_logs(vars: impl Fn(&str) -> Option<String>) -> bool {
    get_optional_env(&vars, "LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json"))
}

/// Get an environment variable with a default value.
fn get_env_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}
