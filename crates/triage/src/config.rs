//! Run configuration.
//!
//! [`RunInputs`] is the raw shape handed over by the task runner: every
//! value optional, blank strings meaning "not set" (GitHub Actions passes
//! unset inputs as empty strings). [`RunConfig::from_inputs`] validates it
//! into a [`RunConfig`] before any network call is made; all failures here
//! are fatal.

use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{LabelMapping, PromptVocabulary, RepositoryId, TriageError, UnmappedPolicy};

/// Default upper bound on items fetched per run.
pub const DEFAULT_MAX_ITEMS: u32 = 10;

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

/// The LLM provider used to classify items. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    DeepSeek,
}

impl ProviderKind {
    /// Order in which credentials are inspected when no provider is named.
    pub const PREFERENCE: [ProviderKind; 3] =
        [ProviderKind::Gemini, ProviderKind::OpenAi, ProviderKind::DeepSeek];

    /// Name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    /// Name of the input carrying this provider's credential.
    pub fn credential_input(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-api-key",
            ProviderKind::OpenAi => "openai-api-key",
            ProviderKind::DeepSeek => "deepseek-api-key",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parsing from input strings
// ---------------------------------------------------------------------------

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(format!(
                "unknown provider '{other}' (expected gemini, openai or deepseek)"
            )),
        }
    }
}

impl FromStr for UnmappedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(UnmappedPolicy::Drop),
            "literal" => Ok(UnmappedPolicy::Literal),
            other => Err(format!(
                "unknown unmapped policy '{other}' (expected drop or literal)"
            )),
        }
    }
}

impl FromStr for PromptVocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "categories" => Ok(PromptVocabulary::Categories),
            "labels" => Ok(PromptVocabulary::Labels),
            other => Err(format!(
                "unknown prompt vocabulary '{other}' (expected categories or labels)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and validated configuration
// ---------------------------------------------------------------------------

/// Unvalidated run inputs.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub provider: Option<ProviderKind>,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub model: Option<String>,
    pub label_mapping: Option<String>,
    pub max_items: Option<u32>,
    pub unmapped_policy: UnmappedPolicy,
    pub prompt_vocabulary: PromptVocabulary,
}

/// Validated configuration for one run.
#[derive(Debug)]
pub struct RunConfig {
    pub github_token: SecretString,
    pub repository: RepositoryId,
    pub provider: ProviderKind,
    pub llm_api_key: SecretString,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    pub label_mapping: LabelMapping,
    pub max_items: u32,
    pub unmapped_policy: UnmappedPolicy,
    pub prompt_vocabulary: PromptVocabulary,
}

impl RunConfig {
    /// Validates raw inputs.
    ///
    /// Credentials are checked first, then the label mapping, then the
    /// remaining options.
    ///
    /// # Errors
    ///
    /// - [`TriageError::MissingCredential`] if the repository token is blank,
    ///   or no usable LLM credential is present for the selected provider.
    /// - [`TriageError::InvalidLabelMapping`] if the mapping is absent or
    ///   malformed.
    /// - [`TriageError::ConfigurationError`] for a malformed repository id, a
    ///   zero item limit, or the `labels` vocabulary combined with the `drop`
    ///   policy.
    pub fn from_inputs(inputs: RunInputs) -> Result<Self, TriageError> {
        let github_token =
            non_blank(inputs.github_token).ok_or_else(|| TriageError::MissingCredential {
                name: "github-token".to_string(),
            })?;

        let (provider, llm_api_key) = select_provider(
            inputs.provider,
            [
                non_blank(inputs.gemini_api_key),
                non_blank(inputs.openai_api_key),
                non_blank(inputs.deepseek_api_key),
            ],
        )?;

        let label_mapping = LabelMapping::parse(inputs.label_mapping.as_deref().unwrap_or(""))?;

        let repository = non_blank(inputs.repository)
            .as_deref()
            .and_then(RepositoryId::parse)
            .ok_or_else(|| TriageError::ConfigurationError {
                message: "repository must be given as 'owner/repo'".to_string(),
            })?;

        let max_items = inputs.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
        if max_items == 0 {
            return Err(TriageError::ConfigurationError {
                message: "max items must be at least 1".to_string(),
            });
        }

        if inputs.prompt_vocabulary == PromptVocabulary::Labels
            && inputs.unmapped_policy == UnmappedPolicy::Drop
        {
            return Err(TriageError::ConfigurationError {
                message: "prompt vocabulary 'labels' requires unmapped policy 'literal'"
                    .to_string(),
            });
        }

        Ok(Self {
            github_token: SecretString::from(github_token),
            repository,
            provider,
            llm_api_key: SecretString::from(llm_api_key),
            model: non_blank(inputs.model),
            label_mapping,
            max_items,
            unmapped_policy: inputs.unmapped_policy,
            prompt_vocabulary: inputs.prompt_vocabulary,
        })
    }
}

// `keys` is indexed in `ProviderKind::PREFERENCE` order.
fn select_provider(
    requested: Option<ProviderKind>,
    keys: [Option<String>; 3],
) -> Result<(ProviderKind, String), TriageError> {
    let mut available = ProviderKind::PREFERENCE.into_iter().zip(keys);

    match requested {
        Some(kind) => available
            .find(|(k, _)| *k == kind)
            .and_then(|(k, key)| key.map(|key| (k, key)))
            .ok_or_else(|| TriageError::MissingCredential {
                name: kind.credential_input().to_string(),
            }),
        None => available
            .find_map(|(k, key)| key.map(|key| (k, key)))
            .ok_or_else(|| TriageError::MissingCredential {
                name: "gemini-api-key, openai-api-key or deepseek-api-key".to_string(),
            }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
