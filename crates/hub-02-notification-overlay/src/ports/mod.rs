//! # Ports Layer
//!
//! - **Driving Ports (Inbound)**: `NotificationOverlayApi`, `NotificationPublisherApi`
//! - **Driven Ports (Outbound)**: `NotificationStore`, `OverlayStore`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
