//! # Ports Layer
//!
//! - **Driving Ports (Inbound)**: `AccountActionApi`, `SessionApi`
//! - **Driven Ports (Outbound)**: `AccountStore`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
