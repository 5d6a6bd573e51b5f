//! # Production Storage Adapters
//!
//! Production-ready storage backends using RocksDB.
//!
//! ## Usage
//!
//! Enable the `rocksdb` feature to use these adapters:
//!
//! ```toml
//! hub-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! One database serves all three store ports; each record type gets its own
//! column family.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{
    RocksDbConfig, RocksDbHubStore, CF_ACCOUNTS, CF_BROADCAST, CF_BROADCAST_ORDER, CF_META,
    CF_OVERLAY, CF_PRIVATE, CF_PRIVATE_BY_OWNER, COLUMN_FAMILIES,
};
