//! # Overlay Service
//!
//! Application service implementing `NotificationOverlayApi` and
//! `NotificationPublisherApi`.
//!
//! Broadcast notifications are stored once. Each account's view of them is
//! expressed only through its `OverlayRecord`, so marking a broadcast never
//! touches the shared record and never affects another account.

use async_trait::async_trait;
use shared_types::{TimeSource, Timestamp};
use tracing::{debug, info};

use crate::domain::{
    is_broadcast_id, merge_feed, BroadcastNotification, Effect, FeedItem, InvalidInput,
    NewNotification, OverlayError, OverlayRecord, PrivateNotification,
};
use crate::ports::inbound::{NotificationOverlayApi, NotificationPublisherApi};
use crate::ports::outbound::{NotificationStore, OverlayStore};

pub struct OverlayService<N, O, T>
where
    N: NotificationStore,
    O: OverlayStore,
    T: TimeSource,
{
    notifications: N,
    overlays: O,
    clock: T,
}

impl<N, O, T> OverlayService<N, O, T>
where
    N: NotificationStore,
    O: OverlayStore,
    T: TimeSource,
{
    pub fn new(notifications: N, overlays: O, clock: T) -> Self {
        Self {
            notifications,
            overlays,
            clock,
        }
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    pub fn overlays(&self) -> &O {
        &self.overlays
    }

    async fn mark_broadcast(
        &self,
        account_id: Option<&str>,
        notification_id: &str,
        effect: Effect,
    ) -> Result<(), OverlayError> {
        let account_id = present(account_id).ok_or(InvalidInput::MissingAccountId)?;
        if !self.notifications.broadcast_exists(notification_id).await? {
            return Err(OverlayError::BroadcastNotFound(notification_id.to_string()));
        }
        let inserted = self
            .overlays
            .add(account_id, notification_id, effect)
            .await?;
        debug!(
            account_id,
            notification_id,
            effect = %effect,
            inserted,
            "Broadcast notification marked"
        );
        Ok(())
    }

    async fn mark_private(
        &self,
        account_id: Option<&str>,
        notification_id: &str,
        effect: Effect,
    ) -> Result<(), OverlayError> {
        let matched = self
            .notifications
            .flag_private(notification_id, present(account_id), effect)
            .await?;
        if !matched {
            return Err(OverlayError::PrivateNotFound(notification_id.to_string()));
        }
        debug!(notification_id, effect = %effect, "Private notification marked");
        Ok(())
    }

    fn validate_new(
        notification: &NewNotification,
        broadcast: bool,
    ) -> Result<(), InvalidInput> {
        if notification.id.trim().is_empty() {
            return Err(InvalidInput::MissingNotificationId);
        }
        if is_broadcast_id(&notification.id) != broadcast {
            return Err(InvalidInput::ScopePrefixMismatch {
                id: notification.id.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<N, O, T> NotificationOverlayApi for OverlayService<N, O, T>
where
    N: NotificationStore,
    O: OverlayStore,
    T: TimeSource,
{
    async fn list_feed(&self, account_id: &str) -> Result<Vec<FeedItem>, OverlayError> {
        let account_id = present(Some(account_id)).ok_or(InvalidInput::MissingAccountId)?;

        let private = self.notifications.undeleted_private_for(account_id).await?;
        let broadcast = self.notifications.all_broadcast().await?;
        let overlay = self
            .overlays
            .load(account_id)
            .await?
            .unwrap_or_else(|| OverlayRecord::empty(account_id));

        let feed = merge_feed(private, broadcast, &overlay);
        debug!(account_id, items = feed.len(), "Feed listed");
        Ok(feed)
    }

    async fn mark(
        &self,
        account_id: Option<&str>,
        notification_id: &str,
        effect: Effect,
    ) -> Result<(), OverlayError> {
        if notification_id.trim().is_empty() {
            return Err(InvalidInput::MissingNotificationId.into());
        }
        if is_broadcast_id(notification_id) {
            self.mark_broadcast(account_id, notification_id, effect)
                .await
        } else {
            self.mark_private(account_id, notification_id, effect).await
        }
    }
}

#[async_trait]
impl<N, O, T> NotificationPublisherApi for OverlayService<N, O, T>
where
    N: NotificationStore,
    O: OverlayStore,
    T: TimeSource,
{
    async fn publish_broadcast(
        &self,
        notification: NewNotification,
    ) -> Result<Timestamp, OverlayError> {
        Self::validate_new(&notification, true)?;
        let created_at = notification.created_at.unwrap_or_else(|| self.clock.now());
        let id = notification.id.clone();

        self.notifications
            .insert_broadcast(BroadcastNotification {
                id: notification.id,
                classification: notification.classification,
                body: notification.body,
                created_at,
                expiry: notification.expiry,
            })
            .await?;

        info!(notification_id = %id, created_at, "Broadcast notification published");
        Ok(created_at)
    }

    async fn publish_private(
        &self,
        owner: &str,
        notification: NewNotification,
    ) -> Result<Timestamp, OverlayError> {
        let owner = present(Some(owner)).ok_or(InvalidInput::MissingAccountId)?;
        Self::validate_new(&notification, false)?;
        let created_at = notification.created_at.unwrap_or_else(|| self.clock.now());
        let id = notification.id.clone();

        self.notifications
            .insert_private(PrivateNotification {
                id: notification.id,
                owner: owner.to_string(),
                classification: notification.classification,
                body: notification.body,
                created_at,
                expiry: notification.expiry,
                read: false,
                deleted: false,
            })
            .await?;

        info!(notification_id = %id, owner, created_at, "Private notification published");
        Ok(created_at)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
