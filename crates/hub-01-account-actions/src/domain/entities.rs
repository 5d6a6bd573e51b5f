//! # Account Entities
//!
//! The account record and its audit trail.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `balance >= 0` | `balance` is unsigned; debits are checked before mutation |
//! | `audit_log[i].sequence == i + 1` | entries are only created by [`Account::append_audit`] |
//! | Audit entries are immutable | no API hands out `&mut AuditEntry` |

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Timestamp};
use std::fmt;
use std::str::FromStr;

use super::errors::Precondition;

/// Durable record per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Identity assigned by the upstream identity collaborator.
    pub id: AccountId,
    /// Contact address supplied at first session.
    pub email: String,
    /// External access token, refreshed by session calls.
    pub access_token: Option<String>,
    /// Rotation token, replaced wholesale on rotation.
    pub credential: String,
    /// Request quota.
    pub balance: u64,
    pub suspended: bool,
    audit_log: Vec<AuditEntry>,
    pub created_at: Timestamp,
    /// Revision counter used for optimistic concurrency. Bumped by every
    /// persisted write.
    pub version: u64,
}

impl Account {
    /// Creates a fresh account with an empty audit trail at version 0.
    pub fn new(
        id: impl Into<AccountId>,
        email: impl Into<String>,
        credential: impl Into<String>,
        balance: u64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            access_token: None,
            credential: credential.into(),
            balance,
            suspended: false,
            audit_log: Vec::new(),
            created_at,
            version: 0,
        }
    }

    /// The audit trail, oldest first.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Sequence number the next audit entry will carry.
    pub fn next_sequence(&self) -> u64 {
        self.audit_log.len() as u64 + 1
    }

    /// Appends an audit entry numbered `len + 1` and returns it.
    pub fn append_audit(&mut self, draft: AuditDraft, timestamp: Timestamp) -> &AuditEntry {
        let entry = AuditEntry {
            sequence: self.next_sequence(),
            timestamp,
            kind: draft.kind,
            justification: draft.justification,
            detail: draft.detail,
            executor: draft.executor,
        };
        self.audit_log.push(entry);
        &self.audit_log[self.audit_log.len() - 1]
    }

    /// Checks that sequence numbers are exactly `1..=len`.
    pub fn audit_is_contiguous(&self) -> bool {
        self.audit_log
            .iter()
            .enumerate()
            .all(|(i, entry)| entry.sequence == i as u64 + 1)
    }
}

/// Kind of a recorded account mutation.
///
/// Parses from the canonical names and from the legacy wire aliases
/// (`addquota`, `removequota`, `ban`, `unban`, `updatetoken`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditKind {
    Credit,
    Debit,
    Suspend,
    Reinstate,
    RotateCredential,
}

impl AuditKind {
    pub const ALL: [AuditKind; 5] = [
        AuditKind::Credit,
        AuditKind::Debit,
        AuditKind::Suspend,
        AuditKind::Reinstate,
        AuditKind::RotateCredential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::Credit => "credit",
            AuditKind::Debit => "debit",
            AuditKind::Suspend => "suspend",
            AuditKind::Reinstate => "reinstate",
            AuditKind::RotateCredential => "rotate-credential",
        }
    }

    /// Whether the action is rejected without a caller-supplied justification.
    pub fn requires_justification(&self) -> bool {
        !matches!(self, AuditKind::Credit | AuditKind::Debit)
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditKind {
    type Err = Precondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" | "addquota" => Ok(AuditKind::Credit),
            "debit" | "removequota" => Ok(AuditKind::Debit),
            "suspend" | "ban" => Ok(AuditKind::Suspend),
            "reinstate" | "unban" => Ok(AuditKind::Reinstate),
            "rotate-credential" | "updatetoken" => Ok(AuditKind::RotateCredential),
            other => Err(Precondition::UnknownAction(other.to_string())),
        }
    }
}

/// Kind-specific payload of an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDetail {
    /// Signed balance change (credit/debit).
    Quantity(i64),
    /// New credential value (rotate-credential).
    Credential(String),
    /// Optional expiry of a suspension or reinstatement.
    Expiry(Option<Timestamp>),
}

/// Immutable, sequentially numbered record of one account mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub kind: AuditKind,
    pub justification: String,
    pub detail: AuditDetail,
    pub executor: String,
}

/// Everything in an audit entry except what the account assigns on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDraft {
    pub kind: AuditKind,
    pub justification: String,
    pub detail: AuditDetail,
    pub executor: String,
}
