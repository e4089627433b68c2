//! Category → label mapping.
//!
//! The mapping arrives as a JSON object string (e.g.
//! `{"bug": "type:bug", "documentation": "docs"}`) and is parsed once at
//! startup. Anything other than an object of non-empty strings is rejected so
//! the run fails before any network traffic.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{Category, LabelName, TriageError};

/// Associates each category with the label to apply when it is detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMapping {
    entries: BTreeMap<String, LabelName>,
}

impl LabelMapping {
    /// Parses a JSON object whose values are label names.
    ///
    /// # Errors
    ///
    /// [`TriageError::InvalidLabelMapping`] if the input is not valid JSON,
    /// is not an object, or contains a value that is not a non-empty string.
    pub fn parse(raw: &str) -> Result<Self, TriageError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| TriageError::InvalidLabelMapping {
                message: e.to_string(),
            })?;

        let Value::Object(object) = value else {
            return Err(TriageError::InvalidLabelMapping {
                message: format!("expected a JSON object, found {}", json_kind(&value)),
            });
        };

        let mut entries = BTreeMap::new();
        for (category, label) in object {
            let label = match label {
                Value::String(s) => LabelName::new(s),
                other => {
                    return Err(TriageError::InvalidLabelMapping {
                        message: format!(
                            "label for category '{category}' must be a string, found {}",
                            json_kind(&other)
                        ),
                    })
                }
            };
            let label = label.ok_or_else(|| TriageError::InvalidLabelMapping {
                message: format!("label for category '{category}' is empty"),
            })?;
            entries.insert(category, label);
        }

        Ok(Self { entries })
    }

    /// Returns the label configured for `category`, if any.
    pub fn get(&self, category: &str) -> Option<&LabelName> {
        self.entries.get(category)
    }

    /// Iterates `(category, label)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelName)> {
        self.entries.iter().map(|(c, l)| (c.as_str(), l))
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no category is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that are not part of the fixed category vocabulary.
    ///
    /// Such keys only ever match when the model is prompted with repository
    /// labels instead of categories.
    pub fn unknown_categories(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| Category::parse(key).is_none())
    }
}

impl FromIterator<(String, LabelName)> for LabelMapping {
    fn from_iter<T: IntoIterator<Item = (String, LabelName)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
