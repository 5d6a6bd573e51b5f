//! # Inbound Ports (Driving Ports)
//!
//! The public API other services call.

use async_trait::async_trait;
use shared_types::Timestamp;

use crate::domain::{Effect, FeedItem, NewNotification, OverlayError};

/// Read and mark a recipient's feed.
#[async_trait]
pub trait NotificationOverlayApi: Send + Sync {
    /// Returns the recipient's visible notifications, most recent first.
    ///
    /// Read-only. An account with no notifications gets an empty feed.
    async fn list_feed(&self, account_id: &str) -> Result<Vec<FeedItem>, OverlayError>;

    /// Records that a notification was read or deleted.
    ///
    /// Broadcast ids update only the caller's overlay and require
    /// `account_id`. Private ids flag the notification itself. Idempotent.
    async fn mark(
        &self,
        account_id: Option<&str>,
        notification_id: &str,
        effect: Effect,
    ) -> Result<(), OverlayError>;
}

/// Producer side: stores new notifications.
#[async_trait]
pub trait NotificationPublisherApi: Send + Sync {
    /// Stores a notification visible to every account. The id must carry the
    /// broadcast prefix.
    async fn publish_broadcast(&self, notification: NewNotification)
        -> Result<Timestamp, OverlayError>;

    /// Stores a notification visible only to `owner`. The id must not carry
    /// the broadcast prefix.
    async fn publish_private(
        &self,
        owner: &str,
        notification: NewNotification,
    ) -> Result<Timestamp, OverlayError>;
}
