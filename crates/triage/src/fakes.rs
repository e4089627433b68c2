//! In-memory fakes for the port traits (testing only).
//!
//! Provides `MemoryIssueTracker`, `ScriptedProvider`, `FixedClassifier` and
//! `RecordingLog`, which satisfy the trait contracts without network access
//! and record how they were called.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{
    AvailableLabels, Classifier, IssueTracker, Item, ItemContent, ItemNumber, LabelName,
    LlmError, LlmProvider, RepositoryId, RunLog, TrackerError,
};

// ---------------------------------------------------------------------------
// MemoryIssueTracker
// ---------------------------------------------------------------------------

/// Issue tracker backed by fixed item and label lists.
///
/// Applied labels are recorded in call order. Items listed in
/// `failing_items` reject label writes.
#[derive(Debug, Default)]
pub struct MemoryIssueTracker {
    items: Vec<Item>,
    labels: AvailableLabels,
    failing_items: BTreeSet<ItemNumber>,
    applied: Mutex<Vec<(ItemNumber, BTreeSet<LabelName>)>>,
    calls: Mutex<usize>,
}

impl MemoryIssueTracker {
    pub fn new(items: Vec<Item>, labels: AvailableLabels) -> Self {
        Self {
            items,
            labels,
            ..Self::default()
        }
    }

    /// Makes `add_labels` fail for `item`.
    pub fn fail_labeling(mut self, item: ItemNumber) -> Self {
        self.failing_items.insert(item);
        self
    }

    /// Label writes that succeeded, in call order.
    pub fn applied(&self) -> Vec<(ItemNumber, BTreeSet<LabelName>)> {
        locked(&self.applied).clone()
    }

    /// Total number of calls of any kind.
    pub fn call_count(&self) -> usize {
        *locked(&self.calls)
    }

    fn count_call(&self) {
        *locked(&self.calls) += 1;
    }
}

#[async_trait]
impl IssueTracker for MemoryIssueTracker {
    async fn fetch_open_items(
        &self,
        _repo: &RepositoryId,
        limit: u32,
    ) -> Result<Vec<Item>, TrackerError> {
        self.count_call();
        Ok(self.items.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_available_labels(
        &self,
        _repo: &RepositoryId,
    ) -> Result<AvailableLabels, TrackerError> {
        self.count_call();
        Ok(self.labels.clone())
    }

    async fn add_labels(
        &self,
        _repo: &RepositoryId,
        item: ItemNumber,
        labels: &BTreeSet<LabelName>,
    ) -> Result<(), TrackerError> {
        self.count_call();
        if self.failing_items.contains(&item) {
            return Err(TrackerError::Status {
                status: 422,
                body: format!("{{\"message\":\"cannot label #{item}\"}}"),
            });
        }
        locked(&self.applied).push((item, labels.clone()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedProvider
// ---------------------------------------------------------------------------

/// LLM provider that replays a queue of canned results.
///
/// Once the queue is exhausted every call returns an empty reply.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::default(),
        }
    }

    /// Convenience for a provider that always answers successfully.
    pub fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::new(replies.into_iter().map(|r| Ok(r.into())))
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        locked(&self.prompts).clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        locked(&self.prompts).push(prompt.to_string());
        locked(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

// ---------------------------------------------------------------------------
// FixedClassifier
// ---------------------------------------------------------------------------

/// Classifier that returns the same categories for every item and records
/// the content it was asked about.
#[derive(Debug, Default)]
pub struct FixedClassifier {
    categories: Vec<String>,
    seen: Mutex<Vec<ItemContent>>,
}

impl FixedClassifier {
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            seen: Mutex::default(),
        }
    }

    /// Number of classify calls made.
    pub fn call_count(&self) -> usize {
        locked(&self.seen).len()
    }

    /// Content passed to each classify call.
    pub fn seen(&self) -> Vec<ItemContent> {
        locked(&self.seen).clone()
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, content: &ItemContent, _available: &AvailableLabels) -> Vec<String> {
        locked(&self.seen).push(content.clone());
        self.categories.clone()
    }
}

// ---------------------------------------------------------------------------
// RecordingLog
// ---------------------------------------------------------------------------

/// Severity of a message captured by [`RecordingLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// [`RunLog`] that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        locked(&self.entries).clone()
    }

    /// Messages logged at `level`.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        locked(&self.entries)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Warning messages.
    pub fn warnings(&self) -> Vec<String> {
        self.messages(LogLevel::Warn)
    }

    fn push(&self, level: LogLevel, message: &str) {
        locked(&self.entries).push((level, message.to_string()));
    }
}

impl RunLog for RecordingLog {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}

// Poisoning is ignored so recorded calls stay readable after a failed assertion.
fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
