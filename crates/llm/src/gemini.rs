//! Google Gemini provider.
//!
//! Uses the `generateContent` endpoint of the Generative Language API. The
//! key travels in the `x-goog-api-key` header rather than the query string so
//! it can never appear in a URL echoed by a transport error.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use triage::{LlmError, LlmProvider};

use crate::{decode_error, ensure_success, http_client, send_error, ProviderSettings};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    // First text part of the first candidate; blocked or empty answers have none.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client.
#[derive(Debug)]
pub struct GeminiProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// # Errors
    ///
    /// [`LlmError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = http_client(settings.timeout)?;
        Ok(Self {
            api_base: settings.api_base_or(DEFAULT_API_BASE),
            model: settings.model_or(DEFAULT_MODEL),
            api_key: settings.api_key,
            client,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        );
        let request = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "Sending request to Gemini");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let body: GenerateContentResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        Ok(body.into_text())
    }
}
