//! Issue triage LLM provider infrastructure adapter.
//!
//! Implements the [`triage::LlmProvider`] trait once per supported provider:
//!
//! - [`GeminiProvider`]: Google Generative Language `generateContent`.
//! - [`OpenAiProvider`]: OpenAI Chat Completions.
//! - [`DeepSeekProvider`]: DeepSeek's OpenAI-compatible Chat Completions.
//!
//! The provider is chosen once at startup with [`provider_for`]; nothing
//! downstream knows which one is in use.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting and response
//! envelope decoding live here. The [`triage`] crate sees only
//! [`triage::LlmProvider`]. Providers make exactly one request per call and
//! never retry.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use triage::{LlmError, LlmProvider, ProviderKind};

mod chat;
pub mod deepseek;
pub mod gemini;
pub mod openai;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Bound on a single classification request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));

/// Connection settings shared by every provider.
#[derive(Debug)]
pub struct ProviderSettings {
    pub api_key: SecretString,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    /// Overrides the provider's API base URL (proxies, tests).
    pub api_base: Option<String>,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: None,
            api_base: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_base_or(&self, default: &str) -> String {
        self.api_base
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    fn model_or(&self, default: &str) -> String {
        self.model.clone().unwrap_or_else(|| default.to_string())
    }
}

/// Builds the provider for `kind`.
///
/// # Errors
///
/// [`LlmError::Transport`] if the HTTP client cannot be constructed.
pub fn provider_for(
    kind: ProviderKind,
    settings: ProviderSettings,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(settings)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(settings)?),
        ProviderKind::DeepSeek => Arc::new(DeepSeekProvider::new(settings)?),
    };
    Ok(provider)
}

// ---------------------------------------------------------------------------
// Shared HTTP helpers
// ---------------------------------------------------------------------------

fn http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LlmError::Transport {
            message: format!("failed to create HTTP client: {e}"),
        })
}

fn send_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport {
            message: error.to_string(),
        }
    }
}

fn decode_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::MalformedResponse {
            message: error.to_string(),
        }
    }
}

/// Passes a success response through; turns anything else into
/// [`LlmError::Status`] carrying the body verbatim.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Status {
        status: status.as_u16(),
        body,
    })
}
