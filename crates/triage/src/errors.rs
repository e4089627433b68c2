//! Error types for the triage domain.
//!
//! Errors fall into two tiers:
//!
//! - [`TriageError`] covers conditions that abort the whole run: bad
//!   configuration, missing credentials, or a repository that cannot be read.
//! - [`TrackerError`], [`LlmError`] and [`ReplyError`] describe failures of a
//!   single collaborator call. While items are being processed these are
//!   recoverable: the orchestrator logs them and moves on to the next item.
//!
//! No error in this crate carries a retry policy; a failed call is never
//! repeated within a run.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that abort a triage run.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A required credential was not supplied or was blank.
    #[error("Missing required credential: {name}")]
    MissingCredential {
        /// Name of the input that should have carried the credential.
        name: String,
    },

    /// The label mapping could not be parsed into a category → label object.
    #[error("Invalid label mapping JSON: {message}")]
    InvalidLabelMapping {
        /// Description of the parse or shape problem.
        message: String,
    },

    /// Any other configuration problem detected before the run starts.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The repository listing needed to start the run could not be fetched.
    #[error("Failed to {operation}: {source}")]
    Repository {
        /// The listing that failed, e.g. `"list open issues"`.
        operation: &'static str,
        /// The underlying tracker failure.
        #[source]
        source: TrackerError,
    },
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failures reported by an [`crate::IssueTracker`] implementation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("GitHub request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("GitHub API error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The API answered successfully but the body could not be decoded.
    #[error("Unexpected GitHub response: {message}")]
    MalformedResponse {
        /// Description of the decoding problem.
        message: String,
    },
}

/// Failures reported by an [`crate::LlmProvider`] implementation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request did not complete within the provider timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never produced an HTTP response.
    #[error("request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The provider answered successfully but the envelope could not be decoded.
    #[error("unexpected response shape: {message}")]
    MalformedResponse {
        /// Description of the decoding problem.
        message: String,
    },
}

/// Reasons a model reply could not be turned into a list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// The reply was empty after trimming.
    #[error("empty reply")]
    Empty,

    /// The reply (after fence cleanup) is not valid JSON.
    #[error("invalid JSON after cleanup: {reply}")]
    InvalidJson {
        /// The cleaned reply text.
        reply: String,
    },

    /// The reply is valid JSON but not an array.
    #[error("non-array data: {reply}")]
    NotAnArray {
        /// The cleaned reply text.
        reply: String,
    },
}
