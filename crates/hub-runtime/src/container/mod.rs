//! # Hub Container
//!
//! Central container holding the component services with their stores
//! injected.
//!
//! - Stores are chosen once at startup from `HubConfig::storage`
//! - Services are shared behind `Arc` and exposed only through their
//!   inbound port traits

pub mod config;
pub mod services;

pub use config::{ConfigError, HubConfig, SecurityConfig, StorageBackend, StorageConfig};
pub use services::{HubContainer, HubStores};
