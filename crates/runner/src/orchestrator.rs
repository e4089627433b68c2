//! The batch labeling loop.
//!
//! One run lists open items and repository labels once, then walks the items
//! strictly in listing order. Each item ends in exactly one [`ItemOutcome`]:
//!
//! ```text
//! fetched ──(has labels)──────────────────────────────▶ Skipped
//!    │
//!    └─▶ classified ──(no categories)─────────────────▶ NoOp
//!            │
//!            └─▶ reconciled ──(no labels)─────────────▶ NoOp
//!                    │
//!                    └─▶ add_labels ──ok──────────────▶ LabelsApplied
//!                               └──err────────────────▶ Errored
//! ```
//!
//! Only the two listings are fatal. Anything that goes wrong for a single
//! item is logged and the loop continues; labels already applied to earlier
//! items stay applied.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use triage::{
    reconcile, AvailableLabels, Classifier, IssueTracker, Item, ItemContent, ItemOutcome,
    LabelMapping, LabelName, RepositoryId, RunId, RunLog, RunSummary, TriageError,
    UnmappedPolicy,
};

/// Pause inserted after every item to stay below provider rate limits.
pub const ITEM_DELAY: Duration = Duration::from_millis(500);

/// Drives one triage run over a repository.
pub struct BatchOrchestrator {
    tracker: Arc<dyn IssueTracker>,
    classifier: Arc<dyn Classifier>,
    log: Arc<dyn RunLog>,
    mapping: LabelMapping,
    policy: UnmappedPolicy,
    item_delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        classifier: Arc<dyn Classifier>,
        log: Arc<dyn RunLog>,
        mapping: LabelMapping,
        policy: UnmappedPolicy,
    ) -> Self {
        Self {
            tracker,
            classifier,
            log,
            mapping,
            policy,
            item_delay: ITEM_DELAY,
        }
    }

    /// Overrides the pause between items. Tests use [`Duration::ZERO`].
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Processes up to `max_items` open items of `repo`.
    ///
    /// # Errors
    ///
    /// [`TriageError::Repository`] if the item or label listing fails. No
    /// per-item failure is ever returned.
    pub async fn run(
        &self,
        repo: &RepositoryId,
        max_items: u32,
    ) -> Result<RunSummary, TriageError> {
        let run_id = RunId::new_random();
        let span = tracing::info_span!("triage_run", %run_id, repository = %repo, max_items);
        self.run_inner(run_id, repo, max_items).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: RunId,
        repo: &RepositoryId,
        max_items: u32,
    ) -> Result<RunSummary, TriageError> {
        self.log
            .info(&format!("Starting to process issues and PRs for {repo}"));

        let items = self
            .tracker
            .fetch_open_items(repo, max_items)
            .await
            .map_err(|source| TriageError::Repository {
                operation: "list open issues",
                source,
            })?;
        self.log
            .info(&format!("Found {} open issues/PRs to process", items.len()));

        let available = self
            .tracker
            .fetch_available_labels(repo)
            .await
            .map_err(|source| TriageError::Repository {
                operation: "list repository labels",
                source,
            })?;
        self.log
            .info(&format!("Repository has {} available labels", available.len()));
        self.warn_about_missing_labels(&available);

        let mut summary = RunSummary::start(run_id);
        for item in &items {
            let span = tracing::info_span!("triage_item", number = %item.number, kind = %item.kind);
            let outcome = self.process_item(repo, item, &available).instrument(span).await;
            tracing::debug!(number = %item.number, ?outcome, "Item finished");
            summary.record(&outcome);

            tokio::time::sleep(self.item_delay).await;
        }

        let summary = summary.finish();
        self.log.info(&format!(
            "Processing complete. Processed {} items, labeled {} items.",
            summary.processed, summary.labeled
        ));
        Ok(summary)
    }

    async fn process_item(
        &self,
        repo: &RepositoryId,
        item: &Item,
        available: &AvailableLabels,
    ) -> ItemOutcome {
        let (kind, number) = (item.kind, item.number);
        self.log
            .info(&format!("Processing {kind} #{number}: {}", item.title));

        if item.is_labeled() {
            self.log
                .info(&format!("{kind} #{number} already has labels. Skipping."));
            return ItemOutcome::Skipped;
        }

        let content = ItemContent::from_item(item);
        let categories = self.classifier.classify(&content, available).await;
        if categories.is_empty() {
            self.log
                .info(&format!("No categories detected for {kind} #{number}"));
            return ItemOutcome::NoOp;
        }
        self.log.info(&format!(
            "Detected categories for {kind} #{number}: {}",
            categories.join(", ")
        ));

        let labels = reconcile(&categories, &self.mapping, available, self.policy);
        if labels.is_empty() {
            self.log
                .info(&format!("No matching labels found for {kind} #{number}"));
            return ItemOutcome::NoOp;
        }

        let names = labels
            .iter()
            .map(LabelName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        match self.tracker.add_labels(repo, number, &labels).await {
            Ok(()) => {
                self.log
                    .info(&format!("Applied labels: {names} to {kind} #{number}"));
                ItemOutcome::LabelsApplied(labels)
            }
            Err(e) => {
                self.log
                    .warn(&format!("Error processing {kind} #{number}: {e}"));
                ItemOutcome::Errored
            }
        }
    }

    fn warn_about_missing_labels(&self, available: &AvailableLabels) {
        for (category, label) in self.mapping.iter() {
            if !available.contains(label) {
                self.log.warn(&format!(
                    "Label \"{label}\" mapped from category \"{category}\" does not exist in the repository"
                ));
            }
        }
    }
}
