//! Shared value types for the triage domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (content is length-bounded, the category
//! vocabulary is closed) and participate in domain computations.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemNumber, LabelName, RunId};

// ---------------------------------------------------------------------------
// Category vocabulary
// ---------------------------------------------------------------------------

/// The closed set of categories the classifier is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bug,
    Feature,
    Documentation,
    Question,
    Enhancement,
    Security,
    Performance,
}

impl Category {
    /// Every category, in the order they are presented to the model.
    pub const ALL: [Category; 7] = [
        Category::Bug,
        Category::Feature,
        Category::Documentation,
        Category::Question,
        Category::Enhancement,
        Category::Security,
        Category::Performance,
    ];

    /// Returns the wire name of the category, e.g. `"bug"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Feature => "feature",
            Category::Documentation => "documentation",
            Category::Question => "question",
            Category::Enhancement => "enhancement",
            Category::Security => "security",
            Category::Performance => "performance",
        }
    }

    /// Looks up a category by its exact wire name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Whether an [`Item`] is a plain issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Issue => f.write_str("Issue"),
            ItemKind::PullRequest => f.write_str("Pull Request"),
        }
    }
}

/// Snapshot of an open issue or pull request, fetched once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub number: ItemNumber,
    pub title: String,
    /// GitHub reports a missing description as `null`.
    pub body: Option<String>,
    pub kind: ItemKind,
    /// Names of labels already attached to the item.
    pub labels: BTreeSet<String>,
    pub created_at: Timestamp,
}

impl Item {
    /// Returns `true` if the item already carries at least one label.
    ///
    /// Labeled items are never sent to the classifier.
    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Classifier input
// ---------------------------------------------------------------------------

/// Upper bound on the characters of item text sent to the classifier.
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Appended to content that was cut at [`MAX_CONTENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Item text as presented to the classifier: title and description joined,
/// then bounded to [`MAX_CONTENT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemContent(String);

impl ItemContent {
    /// Builds the classifier input from a title and optional description.
    pub fn new(title: &str, body: Option<&str>) -> Self {
        let joined = format!("Title: {title}\n\nDescription: {}", body.unwrap_or(""));
        Self(truncate_chars(joined, MAX_CONTENT_CHARS))
    }

    /// Builds the classifier input for an [`Item`].
    pub fn from_item(item: &Item) -> Self {
        Self::new(&item.title, item.body.as_deref())
    }

    /// Returns the content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the content was cut to fit the limit.
    pub fn is_truncated(&self) -> bool {
        self.0.ends_with(TRUNCATION_MARKER)
            && self.0.chars().count() == MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
    }
}

// Counts Unicode scalar values, so a multi-byte character is never split.
fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Repository labels
// ---------------------------------------------------------------------------

/// Labels that exist in the target repository at run start.
///
/// Read-only for the duration of a run; there is no mid-run refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableLabels(BTreeSet<LabelName>);

impl AvailableLabels {
    /// Returns `true` if a label with this exact name exists.
    pub fn contains(&self, label: &LabelName) -> bool {
        self.0.contains(label)
    }

    /// Number of labels in the repository.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the repository defines no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates label names in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelName> {
        self.0.iter()
    }
}

impl FromIterator<LabelName> for AvailableLabels {
    fn from_iter<T: IntoIterator<Item = LabelName>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

/// Terminal state of one item within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The item already had labels and was not classified.
    Skipped,
    /// These labels were added to the item.
    LabelsApplied(BTreeSet<LabelName>),
    /// Nothing to apply: no categories detected or none survived reconciliation.
    NoOp,
    /// Applying labels failed; the failure was logged and the run continued.
    Errored,
}

/// Run-level counters, reported once when the run ends.
///
/// The counters are informational; they never influence control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    /// Every item iterated, including skipped ones.
    pub processed: usize,
    /// Items that received at least one label.
    pub labeled: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl RunSummary {
    /// Starts an empty summary stamped with the current time.
    pub fn start(run_id: RunId) -> Self {
        Self {
            run_id,
            started_at: Timestamp::now(),
            finished_at: None,
            processed: 0,
            labeled: 0,
            skipped: 0,
            errored: 0,
        }
    }

    /// Counts one processed item with the given outcome.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.processed += 1;
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::LabelsApplied(labels) if !labels.is_empty() => self.labeled += 1,
            ItemOutcome::LabelsApplied(_) | ItemOutcome::NoOp => {}
            ItemOutcome::Errored => self.errored += 1,
        }
    }

    /// Stamps the finish time.
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Timestamp::now());
        self
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_joins_title_and_description() {
        let content = ItemContent::new("Crash on startup", Some("App throws NPE"));

        assert_eq!(
            content.as_str(),
            "Title: Crash on startup\n\nDescription: App throws NPE"
        );
        assert!(!content.is_truncated());
    }

    #[test]
    fn content_without_body_uses_empty_description() {
        let content = ItemContent::new("Question", None);

        assert_eq!(content.as_str(), "Title: Question\n\nDescription: ");
    }

    #[test]
    fn long_content_is_cut_and_marked() {
        let body = "x".repeat(5000);
        let content = ItemContent::new("t", Some(&body));

        assert!(content.as_str().ends_with(TRUNCATION_MARKER));
        assert_eq!(
            content.as_str().chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.len()
        );
        assert!(content.is_truncated());
    }

    #[test]
    fn truncation_never_splits_multibyte_characters() {
        let body = "é".repeat(5000);
        let content = ItemContent::new("t", Some(&body));

        let kept: String = content.as_str().chars().take(MAX_CONTENT_CHARS).collect();
        assert_eq!(kept.chars().count(), MAX_CONTENT_CHARS);
        assert!(content.as_str().ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn content_exactly_at_limit_is_untouched() {
        let prefix = "Title: t\n\nDescription: ";
        let body = "y".repeat(MAX_CONTENT_CHARS - prefix.len());
        let content = ItemContent::new("t", Some(&body));

        assert_eq!(content.as_str().len(), MAX_CONTENT_CHARS);
        assert!(!content.as_str().ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn category_parse_matches_wire_names_only() {
        assert_eq!(Category::parse("bug"), Some(Category::Bug));
        assert_eq!(Category::parse("performance"), Some(Category::Performance));
        assert_eq!(Category::parse("Bug"), None);
        assert_eq!(Category::parse("chore"), None);
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut summary = RunSummary::start(RunId::new_random());
        let applied: BTreeSet<LabelName> = [LabelName::new("type:bug").unwrap()].into();

        summary.record(&ItemOutcome::Skipped);
        summary.record(&ItemOutcome::LabelsApplied(applied));
        summary.record(&ItemOutcome::NoOp);
        summary.record(&ItemOutcome::Errored);
        let summary = summary.finish();

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.labeled, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errored, 1);
        assert!(summary.finished_at.is_some());
    }

    #[test]
    fn item_kind_display_matches_log_wording() {
        assert_eq!(ItemKind::Issue.to_string(), "Issue");
        assert_eq!(ItemKind::PullRequest.to_string(), "Pull Request");
    }
}
