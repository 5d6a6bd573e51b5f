//! # Feed Merge
//!
//! 1. drop private notifications flagged deleted
//! 2. drop broadcast notifications in the overlay's deleted set
//! 3. annotate broadcast notifications with overlay read membership
//! 4. concatenate private first, then broadcast
//! 5. stable sort by `created_at`, most recent first
//!
//! Items with identical `created_at` keep their concatenation order, so a
//! private item precedes a broadcast item stamped at the same instant.

use super::entities::{BroadcastNotification, FeedItem, OverlayRecord, PrivateNotification};

pub fn merge_feed(
    private: Vec<PrivateNotification>,
    broadcast: Vec<BroadcastNotification>,
    overlay: &OverlayRecord,
) -> Vec<FeedItem> {
    let mut feed: Vec<FeedItem> = private
        .into_iter()
        .filter(|n| !n.deleted)
        .map(FeedItem::from)
        .collect();

    feed.extend(
        broadcast
            .into_iter()
            .filter(|n| !overlay.is_deleted(&n.id))
            .map(|n| {
                let read = overlay.is_read(&n.id);
                FeedItem::from_broadcast(n, read)
            }),
    );

    // `sort_by` is stable.
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    feed
}
