//! # Hub Runtime Library
//!
//! Exposes the runtime's modules for the binary and for integration tests.
//!
//! - `container/` - configuration and dependency injection
//! - `dispatcher` - access gate and request routing
//! - `adapters/` - durable store implementations (`rocksdb` feature)

pub mod adapters;
pub mod container;
pub mod dispatcher;

pub use container::{ConfigError, HubConfig, HubContainer, HubStores, StorageBackend};
pub use dispatcher::{status_for, DispatchResponse, Dispatcher, Envelope, HubRequest};
