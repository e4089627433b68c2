//! OpenAI-compatible Chat Completions wire format.
//!
//! Shared by the OpenAI and DeepSeek providers, which speak the same protocol
//! with different endpoints, models and request options.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use triage::LlmError;

use crate::{decode_error, ensure_success, send_error};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// One Chat Completions endpoint with fixed request options.
#[derive(Debug)]
pub(crate) struct ChatCompletions {
    pub(crate) client: reqwest::Client,
    pub(crate) url: String,
    pub(crate) api_key: SecretString,
    pub(crate) model: String,
    pub(crate) system_prompt: Option<&'static str>,
    pub(crate) temperature: Option<f64>,
}

impl ChatCompletions {
    /// Sends `prompt` as the user message and returns the first choice's text.
    pub(crate) async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let body: ChatResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }
}
