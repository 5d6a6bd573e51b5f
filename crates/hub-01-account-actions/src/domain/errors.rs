//! # Domain Errors
//!
//! Error types for the Account Action State Machine.
//!
//! ## Retry Policy
//!
//! | Variant | Retried internally | Surfaced as |
//! |---------|--------------------|-------------|
//! | `NotFound` | never | `ErrorKind::NotFound` |
//! | `InvalidArgument` | never | `ErrorKind::InvalidArgument` |
//! | `Conflict` | bounded, from a fresh read | `ErrorKind::Conflict` once exhausted |
//! | `Unavailable` | never | `ErrorKind::Unavailable` |

use shared_types::{AccountId, ErrorKind, StoreError};
use thiserror::Error;

use super::entities::AuditKind;

/// A violated precondition or malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    /// Credit/debit with a zero, negative or missing amount.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// Debit larger than the current balance.
    #[error("insufficient balance: {balance} available, {requested} requested")]
    InsufficientBalance { balance: u64, requested: u64 },

    /// Credit that would overflow the balance counter.
    #[error("credit of {amount} would overflow balance {balance}")]
    BalanceOverflow { balance: u64, amount: u64 },

    /// Suspend, reinstate and rotate-credential must say why.
    #[error("{0} requires a justification")]
    MissingJustification(AuditKind),

    /// Action name outside the supported set.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Request carried no account identity.
    #[error("account id is required")]
    MissingAccountId,

    /// Field required to create a new account was absent.
    #[error("{0} is required for new accounts")]
    MissingField(&'static str),
}

/// Errors surfaced by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("account not found: {0}")]
    NotFound(AccountId),

    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] Precondition),

    /// Every attempt lost the optimistic-concurrency race.
    #[error("concurrent update conflict on account {account_id} after {attempts} attempts")]
    Conflict { account_id: AccountId, attempts: u32 },

    #[error("account store unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::NotFound(_) => ErrorKind::NotFound,
            AccountError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AccountError::Conflict { .. } => ErrorKind::Conflict,
            AccountError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_converts_to_invalid_argument() {
        let err: AccountError = Precondition::NonPositiveAmount(0).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_store_error_converts_to_unavailable() {
        let err: AccountError = StoreError::Io("timeout".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_missing_justification_names_action() {
        let msg = Precondition::MissingJustification(AuditKind::RotateCredential).to_string();
        assert_eq!(msg, "rotate-credential requires a justification");
    }
}
