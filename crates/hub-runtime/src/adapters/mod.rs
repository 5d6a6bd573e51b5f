//! # Adapters
//!
//! Port implementations that live outside the component crates.

pub mod storage;
