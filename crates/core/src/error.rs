//! Error types for the Seriloka domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator (completion, lookup, storage, transcript) has its own
//! error enum; the top-level [`Error`] wraps them all.

use crate::turn::{TurnId, TurnRole};
use thiserror::Error;

/// The top-level error type for all Seriloka operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Another turn is already in flight")]
    Busy,

    #[error("Cannot send an empty message")]
    EmptyInput,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories a turn recovers from, reported on the outcome and the
/// event bus so callers can branch without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No bearer credential is stored. User-recoverable.
    CredentialMissing,
    /// The completion service failed (network or non-success status).
    CompletionFailure,
    /// The lookup service failed. Always recovered internally.
    LookupFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CredentialMissing => "credential_missing",
            Self::CompletionFailure => "completion_failure",
            Self::LookupFailure => "lookup_failure",
        };
        f.write_str(name)
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("Lookup request failed with status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed lookup response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write store at {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Failed to encode stored value: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("No turn with id {0}")]
    NotFound(TurnId),

    #[error("Turn {id} has role {role} and cannot be edited")]
    NotEditable { id: TurnId, role: TurnRole },

    #[error("Replacement text for turn {0} is empty")]
    EmptyContent(TurnId),
}
