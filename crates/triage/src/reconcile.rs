//! Label reconciliation.
//!
//! Turns the categories returned by the classifier into the labels that will
//! actually be added to an item. The result only ever contains labels that
//! already exist in the repository, so a run can never create labels.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{AvailableLabels, LabelMapping, LabelName};

/// What to do with a category that has no entry in the [`LabelMapping`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Ignore the category.
    #[default]
    Drop,
    /// Use the category string itself as the label name.
    ///
    /// The result is still filtered against [`AvailableLabels`].
    Literal,
}

/// Resolves `categories` to the set of labels to apply.
///
/// Each category is looked up in `mapping`; unmapped categories are handled
/// according to `policy`. Labels missing from `available` are discarded and
/// duplicates collapse. Order of the input is irrelevant to the result.
pub fn reconcile<S: AsRef<str>>(
    categories: &[S],
    mapping: &LabelMapping,
    available: &AvailableLabels,
    policy: UnmappedPolicy,
) -> BTreeSet<LabelName> {
    categories
        .iter()
        .filter_map(|category| {
            let category = category.as_ref();
            match (mapping.get(category), policy) {
                (Some(label), _) => Some(label.clone()),
                (None, UnmappedPolicy::Literal) => LabelName::new(category),
                (None, UnmappedPolicy::Drop) => None,
            }
        })
        .filter(|label| available.contains(label))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn labels(names: &[&str]) -> AvailableLabels {
        names.iter().filter_map(|n| LabelName::new(*n)).collect()
    }

    fn set(names: &[&str]) -> BTreeSet<LabelName> {
        names.iter().filter_map(|n| LabelName::new(*n)).collect()
    }

    #[test]
    fn duplicate_targets_collapse_to_one_label() {
        let mapping =
            LabelMapping::parse(r#"{"bug": "type:bug", "performance": "type:bug"}"#).unwrap();

        let result = reconcile(
            &["bug", "bug", "performance"],
            &mapping,
            &labels(&["type:bug"]),
            UnmappedPolicy::Drop,
        );

        assert_eq!(result, set(&["type:bug"]));
    }

    #[test]
    fn unmapped_categories_are_dropped_by_default() {
        let mapping = LabelMapping::parse(r#"{"bug": "type:bug"}"#).unwrap();

        let result = reconcile(
            &["bug", "documentation"],
            &mapping,
            &labels(&["type:bug", "type:docs", "documentation"]),
            UnmappedPolicy::default(),
        );

        assert_eq!(result, set(&["type:bug"]));
    }

    #[test]
    fn literal_policy_uses_category_as_label_name() {
        let mapping = LabelMapping::parse(r#"{"bug": "type:bug"}"#).unwrap();

        let result = reconcile(
            &["bug", "documentation", "nonsense"],
            &mapping,
            &labels(&["type:bug", "documentation"]),
            UnmappedPolicy::Literal,
        );

        assert_eq!(result, set(&["documentation", "type:bug"]));
    }

    #[test]
    fn labels_missing_from_repository_are_discarded() {
        let mapping = LabelMapping::parse(r#"{"bug": "type:bug", "security": "sec"}"#).unwrap();

        let result = reconcile(
            &["security", "bug"],
            &mapping,
            &labels(&["type:bug"]),
            UnmappedPolicy::Literal,
        );

        assert_eq!(result, set(&["type:bug"]));
    }

    #[test]
    fn result_is_always_a_subset_of_available_labels() {
        let mapping = LabelMapping::parse(
            r#"{"bug": "a", "feature": "b", "question": "c", "security": "d"}"#,
        )
        .unwrap();
        let available = labels(&["a", "c", "question"]);
        let inputs: [&[&str]; 5] = [
            &[],
            &["bug", "feature"],
            &["question", "security", "question"],
            &["unknown", "", "c"],
            &["bug", "feature", "question", "security", "performance"],
        ];

        for categories in inputs {
            for policy in [UnmappedPolicy::Drop, UnmappedPolicy::Literal] {
                let result = reconcile(categories, &mapping, &available, policy);
                assert!(
                    result.iter().all(|label| available.contains(label)),
                    "{categories:?} with {policy:?} produced {result:?}"
                );
            }
        }
    }

    #[test]
    fn empty_classification_yields_empty_set() {
        let mapping = LabelMapping::parse(r#"{"bug": "type:bug"}"#).unwrap();
        let none: [&str; 0] = [];

        let result = reconcile(&none, &mapping, &labels(&["type:bug"]), UnmappedPolicy::Drop);

        assert!(result.is_empty());
    }
}
