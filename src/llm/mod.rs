//! Natural language to SQL: prompt composition and the model client.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{compose, Prompt, SQL_INSTRUCTIONS};

use crate::types::Result;
use async_trait::async_trait;

/// Anything that turns a composed prompt into a SQL string.
///
/// The returned text is whatever the model produced. It is not validated,
/// not restricted to read-only statements and not cleaned of formatting.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}

/// Generator used when no API key is configured.
///
/// Lets the page come up anyway; every submission then reports the missing
/// credential instead of the process refusing to start.
pub struct MissingCredential {
    reason: String,
}

impl MissingCredential {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl SqlGenerator for MissingCredential {
    async fn generate(&self, _prompt: &Prompt) -> Result<String> {
        Err(crate::types::SqlGenError::CredentialMissing(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[tokio::test]
    async fn test_missing_credential_always_fails() {
        let generator = MissingCredential::new("GOOGLE_API_KEY environment variable not set");
        let err = generator.generate(&compose("how many?")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }
}
