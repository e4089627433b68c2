//! LLM gateway for item classification.
//!
//! [`ClassifierAdapter`] turns an [`LlmProvider`] into a [`Classifier`]: it
//! builds the prompt, makes one call, cleans and parses the reply. Every
//! failure along the way becomes a warning and an empty result, so a bad
//! reply for one item can never stop the run.

use std::sync::Arc;

use async_trait::async_trait;
use triage::{
    classification_prompt, parse_reply, AvailableLabels, Classifier, ItemContent, LlmError,
    LlmProvider, PromptVocabulary, ReplyError, RunLog,
};

/// Best-effort classifier over a single LLM provider.
pub struct ClassifierAdapter {
    provider: Arc<dyn LlmProvider>,
    vocabulary: PromptVocabulary,
    log: Arc<dyn RunLog>,
}

impl ClassifierAdapter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        vocabulary: PromptVocabulary,
        log: Arc<dyn RunLog>,
    ) -> Self {
        Self {
            provider,
            vocabulary,
            log,
        }
    }

    fn report_call_failure(&self, error: &LlmError) {
        let name = self.provider.name();
        let message = match error {
            LlmError::Timeout => format!("{name} request timed out"),
            LlmError::Transport { message } => format!("{name} request failed: {message}"),
            LlmError::Status { status, body } => format!("{name} API error: {status} - {body}"),
            LlmError::MalformedResponse { message } => {
                format!("{name} returned an unexpected response: {message}")
            }
        };
        self.log.warn(&message);
    }

    fn report_reply_failure(&self, error: &ReplyError) {
        let name = self.provider.name();
        let message = match error {
            ReplyError::Empty => format!("No response content from {name}."),
            ReplyError::InvalidJson { reply } => {
                format!("{name} returned invalid JSON after cleanup: {reply}")
            }
            ReplyError::NotAnArray { reply } => format!("{name} returned non-array data: {reply}"),
        };
        self.log.warn(&message);
    }
}

#[async_trait]
impl Classifier for ClassifierAdapter {
    async fn classify(&self, content: &ItemContent, available: &AvailableLabels) -> Vec<String> {
        let choices = self.vocabulary.choices(available);
        let prompt = classification_prompt(content, &choices);

        let reply = match self.provider.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                self.report_call_failure(&e);
                return Vec::new();
            }
        };
        tracing::debug!(provider = self.provider.name(), reply = %reply, "Received classification reply");

        parse_reply(&reply).unwrap_or_else(|e| {
            self.report_reply_failure(&e);
            Vec::new()
        })
    }
}
