//! REST API wire types and their conversion into domain types.
//!
//! Only the fields the triage run reads are declared; everything else in the
//! GitHub payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage::{Item, ItemKind, ItemNumber, LabelName, Timestamp};

/// One entry from `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Deserialize)]
pub(crate) struct IssueResponse {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelResponse>,
    pub created_at: DateTime<Utc>,
    /// Present only when the entry is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// A label as it appears both in label listings and on issues.
#[derive(Debug, Deserialize)]
pub(crate) struct LabelResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddLabelsRequest<'a> {
    pub labels: Vec<&'a str>,
}

impl From<IssueResponse> for Item {
    fn from(issue: IssueResponse) -> Self {
        let kind = if issue.pull_request.is_some() {
            ItemKind::PullRequest
        } else {
            ItemKind::Issue
        };
        Item {
            number: ItemNumber::new(issue.number),
            title: issue.title,
            body: issue.body,
            kind,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            created_at: Timestamp::from_utc(issue.created_at),
        }
    }
}

impl LabelResponse {
    /// GitHub never returns an empty label name, but the newtype refuses one.
    pub fn into_label_name(self) -> Option<LabelName> {
        LabelName::new(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pull_request_marker_sets_kind() {
        let raw = serde_json::json!({
            "number": 7,
            "title": "Add dark mode",
            "body": null,
            "labels": [{ "name": "ui", "color": "ffffff" }],
            "created_at": "2024-05-01T12:00:00Z",
            "pull_request": { "url": "https://api.github.com/repos/o/r/pulls/7" }
        });

        let item: Item = serde_json::from_value::<IssueResponse>(raw).unwrap().into();

        assert_eq!(item.kind, ItemKind::PullRequest);
        assert_eq!(item.number, ItemNumber::new(7));
        assert_eq!(item.body, None);
        assert!(item.labels.contains("ui"));
    }

    #[test]
    fn plain_issue_without_labels_is_unlabeled() {
        let raw = serde_json::json!({
            "number": 3,
            "title": "Crash on start",
            "body": "stack trace",
            "labels": [],
            "created_at": "2024-05-01T12:00:00Z"
        });

        let item: Item = serde_json::from_value::<IssueResponse>(raw).unwrap().into();

        assert_eq!(item.kind, ItemKind::Issue);
        assert!(!item.is_labeled());
    }
}
