//! Prompt construction and reply parsing for item classification.
//!
//! Both halves are pure: the HTTP exchange with a provider happens elsewhere.
//! Models frequently wrap JSON in a markdown code fence even when told not to,
//! so [`parse_reply`] removes a fence before decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AvailableLabels, Category, ItemContent, ReplyError};

/// What the prompt offers the model as valid answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVocabulary {
    /// The fixed [`Category`] vocabulary.
    #[default]
    Categories,
    /// The names of the labels that exist in the repository.
    Labels,
}

impl PromptVocabulary {
    /// The answers offered to the model under this vocabulary.
    pub fn choices(self, available: &AvailableLabels) -> Vec<String> {
        match self {
            PromptVocabulary::Categories => {
                Category::ALL.iter().map(|c| c.as_str().to_string()).collect()
            }
            PromptVocabulary::Labels => available.iter().map(|l| l.as_str().to_string()).collect(),
        }
    }
}

/// Builds the instruction sent to the model for one item.
pub fn classification_prompt(content: &ItemContent, choices: &[String]) -> String {
    let choices = choices
        .iter()
        .map(|c| Value::String(c.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an intelligent assistant that classifies GitHub issues and pull requests \
into the following categories: {choices}.

Given the following content, return a JSON array of category names (strings) that apply, \
sorted by relevance. Only include categories that are strongly relevant.

Content:
{content}

Respond with JSON only. Example: [\"bug\", \"performance\"]",
        content = content.as_str(),
    )
}

/// Removes a surrounding markdown code fence, if present.
///
/// Handles an optional language tag after the opening fence (```` ```json ````)
/// and a missing closing fence. Input without a leading fence is only trimmed.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a model reply into an ordered list of category strings.
///
/// Array entries that are not strings, or are blank, are skipped; the rest
/// are trimmed and kept in the order the model gave them.
///
/// # Errors
///
/// - [`ReplyError::Empty`] if the reply is blank.
/// - [`ReplyError::InvalidJson`] if the cleaned reply is not JSON.
/// - [`ReplyError::NotAnArray`] if it is JSON but not an array.
pub fn parse_reply(reply: &str) -> Result<Vec<String>, ReplyError> {
    if reply.trim().is_empty() {
        return Err(ReplyError::Empty);
    }

    let cleaned = strip_code_fence(reply);
    let value: Value = serde_json::from_str(cleaned).map_err(|_| ReplyError::InvalidJson {
        reply: cleaned.to_string(),
    })?;

    match value {
        Value::Array(entries) => Ok(entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()),
        _ => Err(ReplyError::NotAnArray {
            reply: cleaned.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::LabelName;

    #[test]
    fn fenced_and_bare_replies_parse_identically() {
        let bare = parse_reply(r#"["bug"]"#).unwrap();

        for fenced in [
            "```json\n[\"bug\"]\n```",
            "```\n[\"bug\"]\n```",
            "```JSON\n[\"bug\"]\n```",
            "  ```json [\"bug\"]```  ",
            "```json\n[\"bug\"]",
        ] {
            assert_eq!(parse_reply(fenced).unwrap(), bare, "fenced reply {fenced:?}");
        }
    }

    #[test]
    fn keeps_model_order() {
        let categories = parse_reply(r#"["performance", "bug"]"#).unwrap();

        assert_eq!(categories, vec!["performance", "bug"]);
    }

    #[test]
    fn empty_array_is_a_valid_answer() {
        assert_eq!(parse_reply("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn blank_reply_is_reported_as_empty() {
        assert_eq!(parse_reply("   \n"), Err(ReplyError::Empty));
    }

    #[test]
    fn prose_is_invalid_json() {
        let err = parse_reply("This looks like a bug to me.").unwrap_err();

        assert_eq!(
            err,
            ReplyError::InvalidJson {
                reply: "This looks like a bug to me.".to_string()
            }
        );
    }

    #[test]
    fn non_array_json_is_rejected_with_cleaned_reply() {
        let err = parse_reply("```json\n{\"categories\": [\"bug\"]}\n```").unwrap_err();

        assert_eq!(
            err,
            ReplyError::NotAnArray {
                reply: "{\"categories\": [\"bug\"]}".to_string()
            }
        );
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let categories = parse_reply(r#"["bug", 3, null, " feature ", ""]"#).unwrap();

        assert_eq!(categories, vec!["bug", "feature"]);
    }

    #[test]
    fn prompt_embeds_vocabulary_and_content() {
        let content = ItemContent::new("Crash on startup", Some("App throws NPE"));
        let choices = PromptVocabulary::Categories.choices(&AvailableLabels::default());

        let prompt = classification_prompt(&content, &choices);

        assert!(prompt.contains(
            r#""bug", "feature", "documentation", "question", "enhancement", "security", "performance""#
        ));
        assert!(prompt.contains("Title: Crash on startup\n\nDescription: App throws NPE"));
        assert!(prompt.ends_with(r#"Respond with JSON only. Example: ["bug", "performance"]"#));
    }

    #[test]
    fn label_vocabulary_offers_repository_labels() {
        let available: AvailableLabels = ["type:bug", "docs"]
            .into_iter()
            .filter_map(LabelName::new)
            .collect();

        let choices = PromptVocabulary::Labels.choices(&available);

        assert_eq!(choices, vec!["docs", "type:bug"]);
    }
}
