//! Error types for the StorySeed domain.
//!
//! [`StorySeedError`] is what every pipeline and repository operation returns
//! to the presentation layer. The collaborator-level errors
//! ([`CompletionError`], [`StoreError`]) are produced by the infrastructure
//! adapters and wrapped on the way up.
//!
//! ## Taxonomy
//!
//! | Class | Variants | Presentation |
//! |-------|----------|--------------|
//! | Configuration | [`StorySeedError::SetupRequired`] | persistent setup notice; blocks the action |
//! | Transient | [`StorySeedError::Completion`], [`StorySeedError::Store`] | logged; state left unchanged; user may retry |
//! | Validation | [`StorySeedError::Validation`], [`StorySeedError::InvalidTransition`] | rejected before any collaborator call |
//!
//! None of these is fatal to the process.

use thiserror::Error;

use crate::Stage;

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failures of the text-completion collaborator.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API credential is configured; nothing was sent.
    #[error("missing API credential: {0}")]
    MissingCredential(String),

    /// The request never produced an HTTP response (DNS, TLS, connect, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider asked us to slow down.
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// The response parsed but carried no usable text.
    #[error("completion returned no usable text")]
    EmptyResponse,

    /// The response body could not be decoded.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Failures of the persistent-record collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote store has no URL or key configured.
    #[error("storage is not configured")]
    NotConfigured,

    /// The remote store could not be reached.
    #[error("storage unreachable: {0}")]
    Unreachable(String),

    /// The store answered but refused the request.
    #[error("storage rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The addressed record does not exist (or belongs to another user).
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A stored payload could not be decoded.
    #[error("malformed stored record: {0}")]
    Malformed(String),

    /// Local on-device storage failed.
    #[error("local storage I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// Returns `true` if a local fallback should answer instead.
    ///
    /// Only "could not reach / not set up" qualifies; a store that answered
    /// and refused is reported as-is.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(self, StoreError::NotConfigured | StoreError::Unreachable(_))
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Errors surfaced by pipeline and repository operations.
#[derive(Debug, Error)]
pub enum StorySeedError {
    /// A required credential or configuration value is missing.
    ///
    /// Blocks the action entirely; the session is left untouched.
    #[error("setup required: {message}")]
    SetupRequired { message: String },

    /// No user is signed in.
    #[error("no user is signed in")]
    Unauthenticated,

    /// The action is not available in the current pipeline stage.
    #[error("cannot {action} while the session is in stage {stage}")]
    InvalidTransition { action: &'static str, stage: Stage },

    /// A required input is missing or out of range.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The text-completion collaborator failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An optional host capability (clipboard, file export) is not available.
    #[error("{0} is not available on this host")]
    CapabilityUnavailable(&'static str),
}
