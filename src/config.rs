//! Runtime configuration: API credential, model, database location, bind address.

use crate::types::{Result, SqlGenError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Database file used when none is configured.
pub const DEFAULT_DB_PATH: &str = "student.db";

/// Address the page is served on by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Generative Language API root.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key (never serialized)
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model identifier, e.g. "gemini-pro"
    pub model: String,

    /// Path to the SQLite database file
    pub db_path: PathBuf,

    /// Address for the web page
    pub bind: SocketAddr,

    /// API root, overridable for testing against a local stub
    pub api_base: String,

    /// Optional per-request timeout for the model call (none by default)
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Reads `GOOGLE_API_KEY`, `SQLGEN_MODEL`, `SQLGEN_DB_PATH`, `SQLGEN_BIND`,
    /// `SQLGEN_API_BASE` and `SQLGEN_REQUEST_TIMEOUT_SECS`. Anything unset keeps
    /// its default. A missing API key is not an error here; it surfaces when
    /// the generator is built.
    ///
    /// # Errors
    ///
    /// Returns `SqlGenError::Config` if a set variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.api_key = std::env::var(API_KEY_ENV).ok();

        if let Ok(model) = std::env::var("SQLGEN_MODEL") {
            config.model = model;
        }
        if let Ok(path) = std::env::var("SQLGEN_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(bind) = std::env::var("SQLGEN_BIND") {
            config.bind = bind
                .parse()
                .map_err(|e| SqlGenError::config(format!("Invalid SQLGEN_BIND '{}': {}", bind, e)))?;
        }
        if let Ok(base) = std::env::var("SQLGEN_API_BASE") {
            config.api_base = base;
        }
        if let Ok(secs) = std::env::var("SQLGEN_REQUEST_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e| {
                SqlGenError::config(format!("Invalid SQLGEN_REQUEST_TIMEOUT_SECS '{}': {}", secs, e))
            })?;
            config.request_timeout_secs = Some(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail later and less clearly.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SqlGenError::config("model name must not be empty"));
        }
        if self.api_base.trim().is_empty() {
            return Err(SqlGenError::config("API base URL must not be empty"));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(SqlGenError::config("request timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// The API key, or `CredentialMissing` if unset or blank.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SqlGenError::CredentialMissing(format!(
                "{} environment variable not set",
                API_KEY_ENV
            ))),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
