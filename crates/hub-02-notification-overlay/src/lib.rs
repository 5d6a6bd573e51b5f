//! # Notification Overlay Engine (hub-02)
//!
//! Presents a per-account merged feed of private and broadcast
//! notifications. Broadcast notifications are stored once; each account's
//! read/deleted state for them lives in a per-account overlay record.
//!
//! ## Identity Scope
//!
//! A notification id beginning with [`BROADCAST_PREFIX`] (`'G'`) is
//! broadcast-scoped. Every other id is private-scoped.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement | Location |
//! |-----------|-------------|----------|
//! | Broadcast records never change on `mark` | overlay-only writes | service.rs |
//! | Overlay sets only grow | idempotent set insert, no removal op | domain/entities.rs |
//! | Deleted items never listed | filtered during merge | domain/feed.rs |
//! | Private items only reach their owner | owner-indexed query | adapters/memory.rs |
//! | Feed is most recent first | stable sort on `created_at` | domain/feed.rs |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): notifications, overlay record, feed merge
//! - **Ports Layer** (`ports/`): overlay and publisher APIs, store traits
//! - **Service Layer** (`service.rs`): `OverlayService`
//! - **Adapters Layer** (`adapters/`): in-memory stores

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryNotificationStore, InMemoryOverlayStore};
pub use domain::{
    is_broadcast_id, merge_feed, BroadcastNotification, Classification, Effect, FeedItem,
    FeedScope, InvalidInput, NewNotification, OverlayError, OverlayRecord, PrivateNotification,
    BROADCAST_PREFIX,
};
pub use ports::{NotificationOverlayApi, NotificationPublisherApi, NotificationStore, OverlayStore};
pub use service::OverlayService;
