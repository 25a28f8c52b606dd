//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_PROJECT_ID` - Firebase project identifier
//! - `FIREBASE_API_KEY` - Web API key for the Identity Toolkit
//!
//! ## Optional
//! - `FEIRINHA_HOST` - Bind address (default: 127.0.0.1)
//! - `FEIRINHA_PORT` - Listen port (default: 3000)
//! - `FIREBASE_DATABASE_ID` - Firestore database id (default: (default))
//! - `FIREBASE_AUTH_HOST` - Identity Toolkit base URL, overridable for
//!   the emulator (default: <https://identitytoolkit.googleapis.com>)
//! - `FIREBASE_FIRESTORE_HOST` - Firestore base URL, overridable for
//!   the emulator (default: <https://firestore.googleapis.com>)
//! - `FEIRINHA_TOKEN_FILE` - Path of the cached auth token used by the
//!   CLI (default: .feirinha-token)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Feirinha application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Firebase platform configuration
    pub firebase: FirebaseConfig,
    /// Path of the locally cached auth token
    pub token_file: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Firebase platform configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Firebase project identifier
    pub project_id: String,
    /// Web API key passed to Identity Toolkit calls
    pub api_key: SecretString,
    /// Firestore database id within the project
    pub database_id: String,
    /// Identity Toolkit base URL (emulator override point)
    pub auth_host: String,
    /// Firestore base URL (emulator override point)
    pub firestore_host: String,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("auth_host", &self.auth_host)
            .field("firestore_host", &self.firestore_host)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FEIRINHA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEIRINHA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FEIRINHA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEIRINHA_PORT".to_string(), e.to_string()))?;

        let firebase = FirebaseConfig::from_env()?;
        let token_file = get_env_or_default("FEIRINHA_TOKEN_FILE", ".feirinha-token");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            firebase,
            token_file,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FIREBASE_PROJECT_ID")?,
            api_key: SecretString::from(get_required_env("FIREBASE_API_KEY")?),
            database_id: get_env_or_default("FIREBASE_DATABASE_ID", "(default)"),
            auth_host: get_env_or_default(
                "FIREBASE_AUTH_HOST",
                "https://identitytoolkit.googleapis.com",
            ),
            firestore_host: get_env_or_default(
                "FIREBASE_FIRESTORE_HOST",
                "https://firestore.googleapis.com",
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
