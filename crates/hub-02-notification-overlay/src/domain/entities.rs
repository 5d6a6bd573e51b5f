//! # Notification Entities
//!
//! ## Ownership
//!
//! - A `PrivateNotification` owns its own `read`/`deleted` flags.
//! - A `BroadcastNotification` is never mutated to express one account's
//!   view of it; that view lives in the account's `OverlayRecord`.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Timestamp};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::errors::InvalidInput;

/// Reserved identity prefix marking a notification as broadcast-scoped.
pub const BROADCAST_PREFIX: char = 'G';

/// Whether `id` names a broadcast notification.
pub fn is_broadcast_id(id: &str) -> bool {
    id.starts_with(BROADCAST_PREFIX)
}

/// Severity class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Info,
    Warning,
    Error,
    Success,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Info => "info",
            Classification::Warning => "warning",
            Classification::Error => "error",
            Classification::Success => "success",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Classification::Info),
            "warning" => Ok(Classification::Warning),
            "error" => Ok(Classification::Error),
            "success" => Ok(Classification::Success),
            other => Err(InvalidInput::UnknownClassification(other.to_string())),
        }
    }
}

/// A single stored message intended for every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastNotification {
    pub id: String,
    pub classification: Classification,
    pub body: String,
    pub created_at: Timestamp,
    /// Eligible for external garbage collection after this point.
    pub expiry: Option<Timestamp>,
}

/// A message scoped to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateNotification {
    pub id: String,
    pub owner: AccountId,
    pub classification: Classification,
    pub body: String,
    pub created_at: Timestamp,
    pub expiry: Option<Timestamp>,
    pub read: bool,
    /// Soft delete. The record is never physically removed by this core.
    pub deleted: bool,
}

impl PrivateNotification {
    /// Sets the flag selected by `effect`. Returns `false` if already set.
    pub fn flag(&mut self, effect: Effect) -> bool {
        let slot = match effect {
            Effect::Read => &mut self.read,
            Effect::Deleted => &mut self.deleted,
        };
        !std::mem::replace(slot, true)
    }
}

/// What a `mark` call records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Read,
    Deleted,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Read => "read",
            Effect::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Effect::Read),
            "deleted" | "delete" => Ok(Effect::Deleted),
            other => Err(InvalidInput::UnknownEffect(other.to_string())),
        }
    }
}

/// Per-account read/deleted sets over broadcast notification ids.
///
/// Absence of a record is equivalent to both sets being empty. Insertion is
/// idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRecord {
    pub account_id: AccountId,
    pub read: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl OverlayRecord {
    pub fn empty(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    fn set(&self, effect: Effect) -> &BTreeSet<String> {
        match effect {
            Effect::Read => &self.read,
            Effect::Deleted => &self.deleted,
        }
    }

    /// Adds `id` to the set selected by `effect`. Returns `true` if it was
    /// not present before.
    pub fn insert(&mut self, effect: Effect, id: impl Into<String>) -> bool {
        let set = match effect {
            Effect::Read => &mut self.read,
            Effect::Deleted => &mut self.deleted,
        };
        set.insert(id.into())
    }

    pub fn contains(&self, effect: Effect, id: &str) -> bool {
        self.set(effect).contains(id)
    }

    pub fn is_read(&self, id: &str) -> bool {
        self.contains(Effect::Read, id)
    }

    pub fn is_deleted(&self, id: &str) -> bool {
        self.contains(Effect::Deleted, id)
    }
}

/// Producer input for a new notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub id: String,
    #[serde(alias = "type")]
    pub classification: Classification,
    #[serde(alias = "message")]
    pub body: String,
    /// Defaults to the clock's current time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub expiry: Option<Timestamp>,
}

/// Where a feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedScope {
    Private,
    Broadcast,
}

/// One entry of a recipient's merged feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub scope: FeedScope,
    pub classification: Classification,
    pub body: String,
    pub created_at: Timestamp,
    pub expiry: Option<Timestamp>,
    /// Own flag for private items, overlay membership for broadcast items.
    pub read: bool,
}

impl From<PrivateNotification> for FeedItem {
    fn from(n: PrivateNotification) -> Self {
        Self {
            id: n.id,
            scope: FeedScope::Private,
            classification: n.classification,
            body: n.body,
            created_at: n.created_at,
            expiry: n.expiry,
            read: n.read,
        }
    }
}

impl FeedItem {
    pub fn from_broadcast(n: BroadcastNotification, read: bool) -> Self {
        Self {
            id: n.id,
            scope: FeedScope::Broadcast,
            classification: n.classification,
            body: n.body,
            created_at: n.created_at,
            expiry: n.expiry,
            read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_prefix() {
        assert!(is_broadcast_id("G1"));
        assert!(is_broadcast_id("G-maintenance"));
        assert!(!is_broadcast_id("U1"));
        assert!(!is_broadcast_id("g1"));
        assert!(!is_broadcast_id(""));
    }

    #[test]
    fn test_overlay_insert_is_idempotent() {
        let mut overlay = OverlayRecord::empty("A1");
        assert!(overlay.insert(Effect::Read, "G1"));
        assert!(!overlay.insert(Effect::Read, "G1"));
        assert_eq!(overlay.read.len(), 1);
        assert!(overlay.is_read("G1"));
        assert!(!overlay.is_deleted("G1"));
    }

    #[test]
    fn test_private_flag_reports_change() {
        let mut n = PrivateNotification {
            id: "P1".to_string(),
            owner: "A1".to_string(),
            classification: Classification::Info,
            body: "hi".to_string(),
            created_at: 0,
            expiry: None,
            read: false,
            deleted: false,
        };
        assert!(n.flag(Effect::Read));
        assert!(!n.flag(Effect::Read));
        assert!(n.read);
        assert!(!n.deleted);
    }

    #[test]
    fn test_effect_parsing() {
        assert_eq!("read".parse::<Effect>().unwrap(), Effect::Read);
        assert_eq!("deleted".parse::<Effect>().unwrap(), Effect::Deleted);
        assert_eq!("delete".parse::<Effect>().unwrap(), Effect::Deleted);
        assert_eq!(
            "archive".parse::<Effect>().unwrap_err(),
            InvalidInput::UnknownEffect("archive".to_string())
        );
    }

    #[test]
    fn test_classification_wire_names() {
        for c in [
            Classification::Info,
            Classification::Warning,
            Classification::Error,
            Classification::Success,
        ] {
            assert_eq!(c.as_str().parse::<Classification>().unwrap(), c);
            assert_eq!(
                serde_json::to_string(&c).unwrap(),
                format!("\"{}\"", c.as_str())
            );
        }
    }

    #[test]
    fn test_new_notification_accepts_legacy_field_names() {
        let n: NewNotification =
            serde_json::from_str(r#"{"id":"G9","type":"warning","message":"maintenance"}"#)
                .unwrap();
        assert_eq!(n.classification, Classification::Warning);
        assert_eq!(n.body, "maintenance");
        assert_eq!(n.created_at, None);
    }
}
