//! Issue triage orchestration.
//!
//! This crate provides the classifier gateway that wraps every LLM call with
//! prompt construction and reply cleanup, and the [`BatchOrchestrator`] that
//! drives one labeling run over a repository.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The orchestrator sequences calls between business
//! logic in the [`triage`] crate and infrastructure traits (GitHub, LLM). It
//! contains no domain rules of its own.

pub mod classifier;
pub mod orchestrator;

pub use classifier::ClassifierAdapter;
pub use orchestrator::{BatchOrchestrator, ITEM_DELAY};
