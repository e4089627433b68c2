//! Issue triage CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read flags and their GitHub Actions environment
//!    fallbacks, then validate them into a [`triage::RunConfig`]. Any problem
//!    here aborts before a single network request is made.
//! 2. **Wire observability**: configure `tracing-subscriber` and, when an OTLP
//!    endpoint is configured, the OpenTelemetry exporter.
//! 3. **Construct infrastructure**: create the [`github::GithubClient`] and the
//!    selected LLM provider, and inject them into the
//!    [`runner::BatchOrchestrator`].
//! 4. **Report**: exit non-zero with a workflow `::error::` annotation on a
//!    fatal error. Per-item failures never change the exit status.

mod args;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use github::GithubClient;
use llm::{provider_for, ProviderSettings};
use runner::{BatchOrchestrator, ClassifierAdapter};
use triage::{PromptVocabulary, RunConfig, RunLog, RunSummary, TracingRunLog};

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let telemetry = match telemetry::init(args.log_format()) {
        Ok(guard) => guard,
        Err(e) => {
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&args).await {
        Ok(summary) => {
            tracing::info!(
                run_id = %summary.run_id,
                processed = summary.processed,
                labeled = summary.labeled,
                skipped = summary.skipped,
                errored = summary.errored,
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Run aborted");
            report_failure(&e);
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(args: &Args) -> anyhow::Result<RunSummary> {
    let config = RunConfig::from_inputs(args.to_inputs()?)?;
    let log: Arc<dyn RunLog> = Arc::new(TracingRunLog);

    if config.prompt_vocabulary == PromptVocabulary::Categories {
        for key in config.label_mapping.unknown_categories() {
            log.warn(&format!(
                "Label mapping key \"{key}\" is not a known category and will never be returned"
            ));
        }
    }

    tracing::info!(
        repository = %config.repository,
        provider = %config.provider,
        max_items = config.max_items,
        "Configuration loaded"
    );

    let tracker = GithubClient::new(&config.github_token, args.github_api_url())
        .context("failed to create GitHub client")?;
    let provider = provider_for(
        config.provider,
        ProviderSettings::new(config.llm_api_key).with_model(config.model),
    )
    .with_context(|| format!("failed to create {} client", config.provider))?;

    let classifier = ClassifierAdapter::new(provider, config.prompt_vocabulary, log.clone());
    let orchestrator = BatchOrchestrator::new(
        Arc::new(tracker),
        Arc::new(classifier),
        log,
        config.label_mapping,
        config.unmapped_policy,
    );

    Ok(orchestrator
        .run(&config.repository, config.max_items)
        .await?)
}

/// Prints the failure, adding a workflow annotation when run as an Action.
fn report_failure(error: &anyhow::Error) {
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        println!("::error::Action failed: {error:#}");
    } else {
        eprintln!("Action failed: {error:#}");
    }
}
