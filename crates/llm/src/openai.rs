//! OpenAI Chat Completions provider.

use async_trait::async_trait;
use triage::{LlmError, LlmProvider};

use crate::chat::ChatCompletions;
use crate::{http_client, ProviderSettings};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1";

/// OpenAI client. Sends the prompt as a single user message.
#[derive(Debug)]
pub struct OpenAiProvider {
    chat: ChatCompletions,
}

impl OpenAiProvider {
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
                system_prompt: None,
                temperature: None,
            },
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(model = %self.chat.model, "Sending request to OpenAI");
        self.chat.complete(prompt).await
    }
}
