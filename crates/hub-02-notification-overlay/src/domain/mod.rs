//! # Domain Layer
//!
//! Pure domain logic for the Notification Overlay Engine.
//!
//! - `entities`: broadcast and private notifications, overlay records, feed items
//! - `feed`: the merge that turns stored records into one ordered feed
//! - `errors`: input rejections and service failures
//!
//! This module contains NO I/O dependencies.

pub mod entities;
pub mod errors;
pub mod feed;

pub use entities::*;
pub use errors::*;
pub use feed::*;
