//! DeepSeek provider (OpenAI-compatible Chat Completions).

use async_trait::async_trait;
use triage::{LlmError, LlmProvider};

use crate::chat::ChatCompletions;
use crate::{http_client, ProviderSettings};

const DEFAULT_API_BASE: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-reasoner";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const TEMPERATURE: f64 = 0.2;

/// DeepSeek client. Adds a short system message and a low temperature.
#[derive(Debug)]
pub struct DeepSeekProvider {
    chat: ChatCompletions,
}

impl DeepSeekProvider {
    /// # Errors
    ///
    /// [`LlmError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let client = http_client(settings.timeout)?;
        Ok(Self {
            chat: ChatCompletions {
                client,
                url: format!("{}/chat/completions", settings.api_base_or(DEFAULT_API_BASE)),
                model: settings.model_or(DEFAULT_MODEL),
                api_key: settings.api_key,
                system_prompt: Some(SYSTEM_PROMPT),
                temperature: Some(TEMPERATURE),
            },
        })
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "DeepSeek"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(model = %self.chat.model, "Sending request to DeepSeek");
        self.chat.complete(prompt).await
    }
}
