//! In-memory notification and overlay stores.
//!
//! Notifications are kept in insertion order with an id index and an owner
//! index over private notifications.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::StoreError;
use std::collections::HashMap;

use crate::domain::{BroadcastNotification, Effect, OverlayRecord, PrivateNotification};
use crate::ports::outbound::{NotificationStore, OverlayStore};

#[derive(Debug, Default)]
struct Notifications {
    broadcast: Vec<BroadcastNotification>,
    private: Vec<PrivateNotification>,
    /// Any id to its slot in `broadcast` or `private`.
    index: HashMap<String, Slot>,
    by_owner: HashMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Broadcast(usize),
    Private(usize),
}

#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    inner: RwLock<Notifications>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of a private notification regardless of flags.
    pub fn private(&self, id: &str) -> Option<PrivateNotification> {
        let inner = self.inner.read();
        match inner.index.get(id) {
            Some(Slot::Private(i)) => inner.private.get(*i).cloned(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn undeleted_private_for(
        &self,
        owner: &str,
    ) -> Result<Vec<PrivateNotification>, StoreError> {
        let inner = self.inner.read();
        let Some(slots) = inner.by_owner.get(owner) else {
            return Ok(Vec::new());
        };
        Ok(slots
            .iter()
            .filter_map(|&i| inner.private.get(i))
            .filter(|n| !n.deleted)
            .cloned()
            .collect())
    }

    async fn all_broadcast(&self) -> Result<Vec<BroadcastNotification>, StoreError> {
        Ok(self.inner.read().broadcast.clone())
    }

    async fn broadcast_exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(matches!(
            self.inner.read().index.get(id),
            Some(Slot::Broadcast(_))
        ))
    }

    async fn flag_private(
        &self,
        id: &str,
        owner: Option<&str>,
        effect: Effect,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let Some(&Slot::Private(i)) = inner.index.get(id) else {
            return Ok(false);
        };
        let Some(notification) = inner.private.get_mut(i) else {
            return Ok(false);
        };
        if owner.is_some_and(|owner| owner != notification.owner) {
            return Ok(false);
        }
        notification.flag(effect);
        Ok(true)
    }

    async fn insert_broadcast(
        &self,
        notification: BroadcastNotification,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.index.contains_key(&notification.id) {
            return Err(StoreError::Duplicate(notification.id));
        }
        let slot = Slot::Broadcast(inner.broadcast.len());
        inner.index.insert(notification.id.clone(), slot);
        inner.broadcast.push(notification);
        Ok(())
    }

    async fn insert_private(&self, notification: PrivateNotification) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.index.contains_key(&notification.id) {
            return Err(StoreError::Duplicate(notification.id));
        }
        let i = inner.private.len();
        inner.index.insert(notification.id.clone(), Slot::Private(i));
        inner
            .by_owner
            .entry(notification.owner.clone())
            .or_default()
            .push(i);
        inner.private.push(notification);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOverlayStore {
    records: RwLock<HashMap<String, OverlayRecord>>,
}

impl InMemoryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OverlayStore for InMemoryOverlayStore {
    async fn load(&self, account_id: &str) -> Result<Option<OverlayRecord>, StoreError> {
        Ok(self.records.read().get(account_id).cloned())
    }

    async fn add(&self, account_id: &str, id: &str, effect: Effect) -> Result<bool, StoreError> {
        let mut records = self.records.write();
        let record = records
            .entry(account_id.to_string())
            .or_insert_with(|| OverlayRecord::empty(account_id));
        Ok(record.insert(effect, id))
    }
}
