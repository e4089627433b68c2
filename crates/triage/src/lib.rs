//! Core domain for issue triage.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, and error type used to classify issues and reconcile labels.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ItemNumber`, `LabelName`, `RepositoryId`, `RunId`) |
//! | [`types`] | Value types (`Item`, `ItemContent`, `AvailableLabels`, `RunSummary`, ...) |
//! | [`errors`] | Fatal run errors and per-collaborator errors |
//! | [`mapping`] | Category → label mapping parser |
//! | [`reconcile`] | Categories → applicable labels |
//! | [`classification`] | Prompt construction and reply parsing |
//! | [`config`] | Run inputs and their validation |
//! | [`ports`] | `IssueTracker`, `LlmProvider`, `Classifier`, `RunLog` |
//! | [`fakes`] | In-memory port implementations for tests |

pub mod classification;
pub mod config;
pub mod errors;
pub mod fakes;
pub mod identifiers;
pub mod mapping;
pub mod ports;
pub mod reconcile;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classification::{classification_prompt, parse_reply, strip_code_fence, PromptVocabulary};
pub use config::{ProviderKind, RunConfig, RunInputs, DEFAULT_MAX_ITEMS};
pub use errors::{LlmError, ReplyError, TrackerError, TriageError};
pub use identifiers::{ItemNumber, LabelName, RepositoryId, RunId};
pub use mapping::LabelMapping;
pub use ports::{Classifier, IssueTracker, LlmProvider, RunLog, TracingRunLog};
pub use reconcile::{reconcile, UnmappedPolicy};
pub use types::{
    AvailableLabels, Category, Item, ItemContent, ItemKind, ItemOutcome, RunSummary, Timestamp,
    MAX_CONTENT_CHARS, TRUNCATION_MARKER,
};
