//! Error types for the question → SQL → rows pipeline.
//!
//! Uses `thiserror` for error definitions with automatic `From` implementations.
//! Every variant maps onto a small closed [`ErrorKind`] so callers can tell a
//! missing credential from a model outage from a failed statement.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SqlGenError>;

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// API credential not configured
    CredentialMissing,
    /// Model API unreachable, rejected the request, or answered with garbage
    Transport,
    /// Generated statement failed inside SQLite
    Execution,
    /// Local configuration or I/O problem
    Config,
}

impl ErrorKind {
    /// Stable lowercase name, used in JSON error bodies and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::CredentialMissing => "credential_missing",
            ErrorKind::Transport => "transport",
            ErrorKind::Execution => "execution",
            ErrorKind::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for all sqlgen operations.
#[derive(Error, Debug)]
pub enum SqlGenError {
    /// API key absent or empty
    #[error("Missing credential: {0}")]
    CredentialMissing(String),

    /// Model API answered with a failure status
    #[error("Model API error: {0}")]
    Transport(String),

    /// HTTP client error (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model API answered 2xx but without a usable text field
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// SQLite rejected or failed the statement
    #[error("{0}")]
    Execution(#[from] rusqlite::Error),

    /// Statement task died before producing rows
    #[error("Query aborted: {0}")]
    Aborted(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SqlGenError {
    /// Create a configuration error with context.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error with context.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed-response error with context.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Classify the error.
    ///
    /// # Returns
    ///
    /// The [`ErrorKind`] this variant belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqlGenError::CredentialMissing(_) => ErrorKind::CredentialMissing,
            SqlGenError::Transport(_)
            | SqlGenError::Http(_)
            | SqlGenError::MalformedResponse(_)
            | SqlGenError::Json(_) => ErrorKind::Transport,
            SqlGenError::Execution(_) | SqlGenError::Aborted(_) => ErrorKind::Execution,
            SqlGenError::Config(_) | SqlGenError::Io(_) => ErrorKind::Config,
        }
    }

    /// Check if the pipeline can carry on after this error.
    ///
    /// Only statement failures are recoverable: they turn into an empty
    /// result set with a visible message.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Execution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            SqlGenError::CredentialMissing("GOOGLE_API_KEY".into()).kind(),
            ErrorKind::CredentialMissing
        );
        assert_eq!(SqlGenError::transport("503").kind(), ErrorKind::Transport);
        assert_eq!(SqlGenError::malformed("no candidates").kind(), ErrorKind::Transport);
        assert_eq!(SqlGenError::config("bad bind").kind(), ErrorKind::Config);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(SqlGenError::from(io).kind(), ErrorKind::Config);

        let sqlite = rusqlite::Error::InvalidQuery;
        assert_eq!(SqlGenError::from(sqlite).kind(), ErrorKind::Execution);
    }

    #[test]
    fn test_only_execution_is_recoverable() {
        assert!(SqlGenError::from(rusqlite::Error::InvalidQuery).is_recoverable());
        assert!(!SqlGenError::transport("down").is_recoverable());
        assert!(!SqlGenError::CredentialMissing("x".into()).is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = SqlGenError::CredentialMissing("GOOGLE_API_KEY environment variable not set".into());
        assert_eq!(
            err.to_string(),
            "Missing credential: GOOGLE_API_KEY environment variable not set"
        );
        assert_eq!(ErrorKind::Transport.to_string(), "transport");
    }
}
