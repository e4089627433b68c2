//! Port traits implemented by infrastructure crates.
//!
//! The domain defines *what* it needs from the outside world; the `github`
//! and `llm` crates define *how*. All async traits use `async_trait` so they
//! stay dyn-compatible and can be injected as `Arc<dyn _>`.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{
    AvailableLabels, Item, ItemContent, ItemNumber, LabelName, LlmError, RepositoryId,
    TrackerError,
};

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Read and label access to a repository's issues and pull requests.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists up to `limit` open issues and pull requests, newest first.
    async fn fetch_open_items(
        &self,
        repo: &RepositoryId,
        limit: u32,
    ) -> Result<Vec<Item>, TrackerError>;

    /// Returns every label defined in the repository.
    async fn fetch_available_labels(
        &self,
        repo: &RepositoryId,
    ) -> Result<AvailableLabels, TrackerError>;

    /// Adds `labels` to an item, keeping the labels it already has.
    async fn add_labels(
        &self,
        repo: &RepositoryId,
        item: ItemNumber,
        labels: &BTreeSet<LabelName>,
    ) -> Result<(), TrackerError>;
}

// ---------------------------------------------------------------------------
// Language model
// ---------------------------------------------------------------------------

/// A single-shot text completion service.
///
/// One implementation exists per provider. Implementations hold their own
/// credential and timeout, perform exactly one request per call, and never
/// retry.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for log messages, e.g. `"Gemini"`.
    fn name(&self) -> &str;

    /// Sends `prompt` and returns the model's text reply.
    ///
    /// A successful exchange that carries no text yields an empty string.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Best-effort classification of item text.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Returns category strings sorted by relevance.
    ///
    /// Never fails: any problem is logged and reported as no categories.
    async fn classify(&self, content: &ItemContent, available: &AvailableLabels) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Run-level log sink injected into the classifier and orchestrator.
///
/// Messages written here are the run's user-facing narrative. Warnings mark
/// recoverable per-item failures.
pub trait RunLog: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// [`RunLog`] that forwards every message to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRunLog;

impl RunLog for TracingRunLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "triage::run", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "triage::run", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "triage::run", "{message}");
    }
}
