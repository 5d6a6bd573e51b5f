//! # Domain Errors
//!
//! Error types for the Notification Overlay Engine.

use shared_types::{ErrorKind, StoreError};
use thiserror::Error;

/// Malformed or unacceptable input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("notification id is required")]
    MissingNotificationId,

    #[error("account id is required")]
    MissingAccountId,

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("unknown classification: {0}")]
    UnknownClassification(String),

    /// Broadcast ids must carry the reserved prefix; private ids must not.
    #[error("notification id {id} has the wrong scope prefix")]
    ScopePrefixMismatch { id: String },

    #[error("notification already exists: {0}")]
    DuplicateNotification(String),
}

/// Errors surfaced by the overlay service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("broadcast notification not found: {0}")]
    BroadcastNotFound(String),

    #[error("private notification not found: {0}")]
    PrivateNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidInput),

    #[error("notification store unavailable: {0}")]
    Unavailable(StoreError),
}

impl From<StoreError> for OverlayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(id) => InvalidInput::DuplicateNotification(id).into(),
            other => OverlayError::Unavailable(other),
        }
    }
}

impl OverlayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OverlayError::BroadcastNotFound(_) | OverlayError::PrivateNotFound(_) => {
                ErrorKind::NotFound
            }
            OverlayError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            OverlayError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}
