//! # Error Types
//!
//! Failure vocabulary shared across components.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller-facing classification of every failure the core can surface.
///
/// Component errors project onto this so the dispatcher can map them to a
/// response status without knowing component internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Account or notification missing.
    NotFound,
    /// Malformed input or violated precondition. Never retried.
    InvalidArgument,
    /// Optimistic-concurrency retries exhausted.
    Conflict,
    /// Store I/O failure. Surfaced immediately.
    Unavailable,
    /// Rejected by the authentication gate before any core operation ran.
    Unauthorized,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Unauthorized => "unauthorized",
        }
    }

    /// Whether the failure is terminal for the caller (retrying the same
    /// request cannot succeed).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::InvalidArgument | ErrorKind::Unauthorized
        )
    }
}

/// Errors raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Read or write against the durable store failed.
    #[error("store I/O error: {0}")]
    Io(String),

    /// A persisted record could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serialization(String),

    /// Insert of a key that already exists.
    #[error("record already exists: {0}")]
    Duplicate(String),
}
