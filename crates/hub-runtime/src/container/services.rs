//! # Service Wiring
//!
//! ```text
//! HubStores ──► AccountService ──► actions, sessions
//!           └─► OverlayService ──► feed, publisher
//! ```

use std::sync::Arc;

use tracing::info;

use hub_01_account_actions::{
    AccountActionApi, AccountService, AccountStore, InMemoryAccountStore, SessionApi,
};
use hub_02_notification_overlay::{
    InMemoryNotificationStore, InMemoryOverlayStore, NotificationOverlayApi,
    NotificationPublisherApi, NotificationStore, OverlayService, OverlayStore,
};
use shared_types::{AccessGate, HmacCredentialGenerator, SystemTimeSource, TimeSource};

use crate::container::config::{ConfigError, HubConfig, StorageBackend};

/// The three stores every deployment needs.
#[derive(Clone)]
pub struct HubStores {
    pub accounts: Arc<dyn AccountStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub overlays: Arc<dyn OverlayStore>,
}

impl HubStores {
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountStore::new()),
            notifications: Arc::new(InMemoryNotificationStore::new()),
            overlays: Arc::new(InMemoryOverlayStore::new()),
        }
    }

    /// Opens the stores selected by `config`.
    pub fn open(config: &HubConfig) -> Result<Self, ConfigError> {
        match config.storage.backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::RocksDb => Self::rocksdb(config),
        }
    }

    #[cfg(feature = "rocksdb")]
    fn rocksdb(config: &HubConfig) -> Result<Self, ConfigError> {
        use crate::adapters::storage::{RocksDbConfig, RocksDbHubStore};

        let path = config.storage.data_dir.join("hub");
        let store = RocksDbHubStore::open(RocksDbConfig::new(path))
            .map_err(|e| ConfigError::StorageUnavailable(e.to_string()))?;
        let store = Arc::new(store);
        Ok(Self {
            accounts: store.clone(),
            notifications: store.clone(),
            overlays: store,
        })
    }

    #[cfg(not(feature = "rocksdb"))]
    fn rocksdb(_config: &HubConfig) -> Result<Self, ConfigError> {
        Err(ConfigError::StorageUnavailable(
            "built without the `rocksdb` feature".to_string(),
        ))
    }
}

/// Component services behind their inbound ports, plus the access gate.
pub struct HubContainer {
    pub actions: Arc<dyn AccountActionApi>,
    pub sessions: Arc<dyn SessionApi>,
    pub feed: Arc<dyn NotificationOverlayApi>,
    pub publisher: Arc<dyn NotificationPublisherApi>,
    pub gate: AccessGate,
    /// Hub configuration (immutable after initialization).
    pub config: HubConfig,
}

impl HubContainer {
    /// Opens the configured stores and wires the services with the system
    /// clock.
    pub fn new(config: HubConfig) -> Result<Self, ConfigError> {
        let stores = HubStores::open(&config)?;
        info!(backend = ?config.storage.backend, "Stores opened");
        Ok(Self::with_stores(config, stores, Arc::new(SystemTimeSource)))
    }

    pub fn with_stores(config: HubConfig, stores: HubStores, clock: Arc<dyn TimeSource>) -> Self {
        let accounts = Arc::new(AccountService::with_config(
            stores.accounts,
            HmacCredentialGenerator::new(config.security.hmac_secret.as_bytes()),
            Arc::clone(&clock),
            config.accounts.clone(),
        ));
        let overlay = Arc::new(OverlayService::new(
            stores.notifications,
            stores.overlays,
            clock,
        ));

        info!(
            max_conflict_retries = config.accounts.max_conflict_retries,
            default_quota = config.accounts.default_quota,
            "Hub container initialized"
        );

        Self {
            actions: accounts.clone(),
            sessions: accounts,
            feed: overlay.clone(),
            publisher: overlay,
            gate: AccessGate::new(config.security.access_key.as_bytes()),
            config,
        }
    }
}
