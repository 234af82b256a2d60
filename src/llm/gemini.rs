//! Gemini `generateContent` client.

use crate::config::Config;
use crate::llm::prompt::Prompt;
use crate::llm::SqlGenerator;
use crate::types::{Result, SqlGenError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Gemini API response (only the fields we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for Google's Generative Language API.
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl GeminiClient {
    /// Create new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `model` - Model name (e.g., "gemini-pro")
    ///
    /// # Errors
    ///
    /// Returns `SqlGenError::CredentialMissing` if the key is blank
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SqlGenError::CredentialMissing(
                "Gemini API key is empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model: model.into(),
            api_base: crate::config::DEFAULT_API_BASE.to_string(),
            client: Client::new(),
        })
    }

    /// Create from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `CredentialMissing` if no key is configured, `Config` if the HTTP
    /// client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SqlGenError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Point the client at a different API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }

    /// Call the API with a two-part prompt and return the raw response body.
    async fn call_gemini(&self, prompt: &Prompt) -> Result<String> {
        let [instructions, question] = prompt.parts();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [
                            {"text": instructions},
                            {"text": question}
                        ]
                    }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SqlGenError::transport(format!("Gemini API error {}: {}", status, body)));
        }

        Ok(body)
    }

    /// Pull the first text field out of a `generateContent` response body.
    ///
    /// The text is returned as-is. Code fences or stray whitespace the model
    /// adds despite the instructions are kept.
    pub fn extract_text(body: &str) -> Result<String> {
        let parsed: GenerateContentResponse = serde_json::from_str(body)?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SqlGenError::malformed("No candidates in Gemini response"))?;

        candidate
            .content
            .into_iter()
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| SqlGenError::malformed("Gemini candidate has no text part"))
    }
}

#[async_trait]
impl SqlGenerator for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        tracing::debug!(model = %self.model, question_len = prompt.question.len(), "Calling Gemini");

        let body = self.call_gemini(prompt).await?;
        let text = Self::extract_text(&body)?;

        tracing::debug!(sql = %text, "Gemini returned query");
        Ok(text)
    }
}
