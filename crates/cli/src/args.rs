//! Command-line and environment inputs.
//!
//! Every option doubles as a GitHub Actions input. The runner exports unset
//! inputs as empty strings, so values are accepted as raw text here and
//! blank ones are treated as absent when converting to [`RunInputs`].

use clap::Parser;
use triage::{RunInputs, TriageError};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "issue-triage",
    version,
    about = "Labels open GitHub issues and pull requests using an LLM classifier"
)]
pub struct Args {
    /// Token used for all GitHub API calls.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Target repository as `owner/repo`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// LLM provider: gemini, openai or deepseek. Inferred from the first key
    /// present when omitted.
    #[arg(long, env = "INPUT_PROVIDER")]
    pub provider: Option<String>,

    #[arg(long, env = "INPUT_GEMINI-API-KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "INPUT_OPENAI-API-KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "INPUT_DEEPSEEK-API-KEY", hide_env_values = true)]
    pub deepseek_api_key: Option<String>,

    /// Overrides the provider's default model.
    #[arg(long, env = "INPUT_MODEL")]
    pub model: Option<String>,

    /// JSON object mapping category names to repository label names.
    #[arg(long, env = "INPUT_LABEL-MAPPING")]
    pub label_mapping: Option<String>,

    /// Maximum number of open items to fetch (default 10).
    #[arg(long, env = "INPUT_MAX-ISSUES")]
    pub max_items: Option<String>,

    /// What to do with categories missing from the mapping: drop or literal.
    #[arg(long, env = "INPUT_UNMAPPED-POLICY")]
    pub unmapped_policy: Option<String>,

    /// Vocabulary offered to the model: categories or labels.
    #[arg(long, env = "INPUT_PROMPT-VOCABULARY")]
    pub prompt_vocabulary: Option<String>,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Log output: text or json.
    #[arg(long, env = "INPUT_LOG-FORMAT")]
    pub log_format: Option<String>,
}

impl Args {
    /// Converts the raw text inputs into typed, still unvalidated inputs.
    ///
    /// # Errors
    ///
    /// [`TriageError::ConfigurationError`] if an enumerated option or the item
    /// limit cannot be parsed.
    pub fn to_inputs(&self) -> Result<RunInputs, TriageError> {
        Ok(RunInputs {
            github_token: self.github_token.clone(),
            repository: self.repository.clone(),
            provider: parse_optional(self.provider.as_deref())?,
            gemini_api_key: self.gemini_api_key.clone(),
            openai_api_key: self.openai_api_key.clone(),
            deepseek_api_key: self.deepseek_api_key.clone(),
            model: self.model.clone(),
            label_mapping: self.label_mapping.clone(),
            max_items: parse_optional(self.max_items.as_deref())
                .map_err(|_| configuration("max items must be a positive integer"))?,
            unmapped_policy: parse_optional(self.unmapped_policy.as_deref())?.unwrap_or_default(),
            prompt_vocabulary: parse_optional(self.prompt_vocabulary.as_deref())?
                .unwrap_or_default(),
        })
    }

    /// Anything other than `json` falls back to text.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// The API base URL, if one was supplied.
    pub fn github_api_url(&self) -> Option<&str> {
        blank_as_none(self.github_api_url.as_deref())
    }
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, TriageError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    blank_as_none(value)
        .map(|v| v.trim().parse::<T>().map_err(|e| configuration(&e.to_string())))
        .transpose()
}

fn blank_as_none(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn configuration(message: &str) -> TriageError {
    TriageError::ConfigurationError {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triage::{PromptVocabulary, ProviderKind, RunConfig, UnmappedPolicy};

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "issue-triage",
            "--github-token",
            "ghs_test",
            "--repository",
            "octo/widgets",
            "--gemini-api-key",
            "g-key",
            "--label-mapping",
            r#"{"bug":"type:bug"}"#,
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_convert_to_a_valid_config() {
        let args = parse(&["--max-items", "25", "--provider", "Gemini"]);

        let config = RunConfig::from_inputs(args.to_inputs().unwrap()).unwrap();

        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.max_items, 25);
        assert_eq!(config.repository.to_string(), "octo/widgets");
        assert_eq!(config.unmapped_policy, UnmappedPolicy::Drop);
        assert_eq!(config.prompt_vocabulary, PromptVocabulary::Categories);
    }

    #[test]
    fn blank_optional_inputs_are_absent() {
        let args = parse(&[
            "--provider",
            "",
            "--max-items",
            " ",
            "--unmapped-policy",
            "",
            "--github-api-url",
            "",
        ]);

        let inputs = args.to_inputs().unwrap();

        assert_eq!(inputs.provider, None);
        assert_eq!(inputs.max_items, None);
        assert_eq!(inputs.unmapped_policy, UnmappedPolicy::Drop);
        assert_eq!(args.github_api_url(), None);
    }

    #[test]
    fn non_numeric_limit_is_a_configuration_error() {
        let args = parse(&["--max-items", "ten"]);

        let err = args.to_inputs().unwrap_err();

        assert!(matches!(err, TriageError::ConfigurationError { .. }));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let args = parse(&["--provider", "claude"]);

        let err = args.to_inputs().unwrap_err();

        assert!(err.to_string().contains("unknown provider 'claude'"));
    }

    #[test]
    fn malformed_mapping_fails_validation() {
        let args = parse(&["--label-mapping", "not json"]);

        let err = RunConfig::from_inputs(args.to_inputs().unwrap()).unwrap_err();

        assert!(matches!(err, TriageError::InvalidLabelMapping { .. }));
    }

    #[test]
    fn log_format_defaults_to_text() {
        assert_eq!(parse(&[]).log_format(), LogFormat::Text);
        assert_eq!(parse(&["--log-format", "JSON"]).log_format(), LogFormat::Json);
        assert_eq!(parse(&["--log-format", ""]).log_format(), LogFormat::Text);
    }
}
