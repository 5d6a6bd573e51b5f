//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the overlay service.

use async_trait::async_trait;
use shared_types::StoreError;
use std::sync::Arc;

use crate::domain::{BroadcastNotification, Effect, OverlayRecord, PrivateNotification};

/// Stored broadcast and private notifications.
///
/// Production: `RocksDbNotificationStore` (hub-runtime/adapters/storage)
/// Testing: `InMemoryNotificationStore` (adapters/memory.rs)
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Private notifications owned by `owner` that are not flagged deleted.
    async fn undeleted_private_for(
        &self,
        owner: &str,
    ) -> Result<Vec<PrivateNotification>, StoreError>;

    async fn all_broadcast(&self) -> Result<Vec<BroadcastNotification>, StoreError>;

    async fn broadcast_exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Sets the flag selected by `effect` on private notification `id`.
    ///
    /// When `owner` is given the notification must belong to it. Returns
    /// whether a notification matched; setting an already-set flag still
    /// counts as a match.
    async fn flag_private(
        &self,
        id: &str,
        owner: Option<&str>,
        effect: Effect,
    ) -> Result<bool, StoreError>;

    /// Fails with `StoreError::Duplicate` if any notification has this id.
    async fn insert_broadcast(&self, notification: BroadcastNotification)
        -> Result<(), StoreError>;

    /// Fails with `StoreError::Duplicate` if any notification has this id.
    async fn insert_private(&self, notification: PrivateNotification) -> Result<(), StoreError>;
}

/// Per-account overlay records.
///
/// ## Atomicity
///
/// `add` is a single upsert: create the record if absent and insert the id
/// into the selected set. Two concurrent `add` calls for the same account
/// must both be reflected afterwards.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    async fn load(&self, account_id: &str) -> Result<Option<OverlayRecord>, StoreError>;

    /// Returns `true` if `id` was newly inserted.
    async fn add(&self, account_id: &str, id: &str, effect: Effect) -> Result<bool, StoreError>;
}

#[async_trait]
impl<T: NotificationStore + ?Sized> NotificationStore for Arc<T> {
    async fn undeleted_private_for(
        &self,
        owner: &str,
    ) -> Result<Vec<PrivateNotification>, StoreError> {
        (**self).undeleted_private_for(owner).await
    }

    async fn all_broadcast(&self) -> Result<Vec<BroadcastNotification>, StoreError> {
        (**self).all_broadcast().await
    }

    async fn broadcast_exists(&self, id: &str) -> Result<bool, StoreError> {
        (**self).broadcast_exists(id).await
    }

    async fn flag_private(
        &self,
        id: &str,
        owner: Option<&str>,
        effect: Effect,
    ) -> Result<bool, StoreError> {
        (**self).flag_private(id, owner, effect).await
    }

    async fn insert_broadcast(
        &self,
        notification: BroadcastNotification,
    ) -> Result<(), StoreError> {
        (**self).insert_broadcast(notification).await
    }

    async fn insert_private(&self, notification: PrivateNotification) -> Result<(), StoreError> {
        (**self).insert_private(notification).await
    }
}

#[async_trait]
impl<T: OverlayStore + ?Sized> OverlayStore for Arc<T> {
    async fn load(&self, account_id: &str) -> Result<Option<OverlayRecord>, StoreError> {
        (**self).load(account_id).await
    }

    async fn add(&self, account_id: &str, id: &str, effect: Effect) -> Result<bool, StoreError> {
        (**self).add(account_id, id, effect).await
    }
}
