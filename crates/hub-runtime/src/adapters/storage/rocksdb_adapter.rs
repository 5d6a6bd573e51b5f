//! # RocksDB Storage Adapter
//!
//! Durable implementation of `AccountStore`, `NotificationStore` and
//! `OverlayStore`.
//!
//! ## Column Families
//!
//! - `accounts` - Account records by id
//! - `broadcast` - Broadcast notifications by id
//! - `broadcast_order` - `seq` -> id, in insertion order
//! - `private` - Private notifications by id
//! - `private_by_owner` - `owner \0 seq` -> id, in insertion order per owner
//! - `overlay` - Overlay records by account id
//! - `meta` - next notification sequence
//!
//! Sequences are big-endian `u64`, so key order is insertion order and feed
//! ties resolve the same way as with the in-memory stores.
//!
//! ## Atomicity
//!
//! Every read-check-write sequence (account CAS, overlay upsert, private
//! flag, inserts) runs under one process-local write mutex and commits as a
//! single `WriteBatch`. Readers never take the mutex. The mutex does not
//! coordinate separate processes sharing the same directory; RocksDB's own
//! lock file refuses a second opener.
//!
//! ## Blocking
//!
//! RocksDB calls are synchronous (writes fsync when `sync_writes` is set).
//! Every port method runs its work on `tokio::task::spawn_blocking`, so the
//! write mutex is never held on a runtime worker thread.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use hub_01_account_actions::{Account, AccountStore, CasOutcome};
use hub_02_notification_overlay::{
    BroadcastNotification, Effect, NotificationStore, OverlayRecord, OverlayStore,
    PrivateNotification,
};
use parking_lot::Mutex;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch,
    WriteOptions, DB,
};
use serde::{de::DeserializeOwned, Serialize};
use shared_types::StoreError;

/// Column family names
pub const CF_ACCOUNTS: &str = "accounts";
pub const CF_BROADCAST: &str = "broadcast";
pub const CF_BROADCAST_ORDER: &str = "broadcast_order";
pub const CF_PRIVATE: &str = "private";
pub const CF_PRIVATE_BY_OWNER: &str = "private_by_owner";
pub const CF_OVERLAY: &str = "overlay";
pub const CF_META: &str = "meta";

/// All column families used by the hub
pub const COLUMN_FAMILIES: &[&str] = &[
    CF_ACCOUNTS,
    CF_BROADCAST,
    CF_BROADCAST_ORDER,
    CF_PRIVATE,
    CF_PRIVATE_BY_OWNER,
    CF_OVERLAY,
    CF_META,
];

const NEXT_SEQUENCE_KEY: &[u8] = b"next_notification_sequence";

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 64 * 1024 * 1024, // 64MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }

    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024, // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed store for every hub record type.
///
/// Cheap to clone; clones share one database handle.
#[derive(Clone)]
pub struct RocksDbHubStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    db: DB,
    /// Write mutex guarding the next notification sequence.
    write_lock: Mutex<u64>,
    config: RocksDbConfig,
}

impl RocksDbHubStore {
    /// Open or create the database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| StoreError::Io(format!("Failed to open RocksDB: {}", e)))?;

        let mut inner = StoreInner {
            db,
            write_lock: Mutex::new(0),
            config,
        };
        let next = inner
            .read::<u64>(CF_META, NEXT_SEQUENCE_KEY)?
            .unwrap_or(0);
        *inner.write_lock.get_mut() = next;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Runs `op` on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&StoreInner) -> Result<T, StoreError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner))
            .await
            .map_err(|e| StoreError::Io(format!("RocksDB task failed: {}", e)))?
    }
}

impl StoreInner {
    fn cf(&self, name: &str) -> Result<&ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Io(format!("missing column family {}", name)))
    }

    fn read<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>, StoreError> {
        let handle = self.cf(cf)?;
        let bytes = self
            .db
            .get_pinned_cf(handle, key)
            .map_err(|e| StoreError::Io(format!("RocksDB get failed: {}", e)))?;
        bytes.map(|bytes| decode(&bytes)).transpose()
    }

    fn exists(&self, cf: &str, key: &[u8]) -> Result<bool, StoreError> {
        let handle = self.cf(cf)?;
        self.db
            .get_pinned_cf(handle, key)
            .map(|v| v.is_some())
            .map_err(|e| StoreError::Io(format!("RocksDB exists check failed: {}", e)))
    }

    fn any_notification_exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.exists(CF_BROADCAST, id.as_bytes())? || self.exists(CF_PRIVATE, id.as_bytes())?)
    }

    /// Values of the keys under `prefix`, in key order.
    fn scan_prefix(&self, cf: &str, prefix: &[u8]) -> Result<Vec<Box<[u8]>>, StoreError> {
        let handle = self.cf(cf)?;
        let mut values = Vec::new();
        for item in self
            .db
            .iterator_cf(handle, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) =
                item.map_err(|e| StoreError::Io(format!("RocksDB scan failed: {}", e)))?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(value);
        }
        Ok(values)
    }

    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| StoreError::Io(format!("RocksDB batch write failed: {}", e)))
    }

    fn put<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(cf)?, key, encode(value)?);
        self.write(batch)
    }

    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        if self.exists(CF_ACCOUNTS, account.id.as_bytes())? {
            return Err(StoreError::Duplicate(account.id));
        }
        self.put(CF_ACCOUNTS, account.id.as_bytes(), &account)
    }

    fn swap_account(
        &self,
        expected_version: u64,
        account: Account,
    ) -> Result<CasOutcome, StoreError> {
        let _guard = self.write_lock.lock();
        let Some(stored) = self.read::<Account>(CF_ACCOUNTS, account.id.as_bytes())? else {
            return Ok(CasOutcome::Missing);
        };
        if stored.version != expected_version {
            return Ok(CasOutcome::VersionMismatch {
                current: stored.version,
            });
        }
        self.put(CF_ACCOUNTS, account.id.as_bytes(), &account)?;
        Ok(CasOutcome::Committed)
    }

    fn undeleted_private(&self, owner: &str) -> Result<Vec<PrivateNotification>, StoreError> {
        let mut found = Vec::new();
        for id in self.scan_prefix(CF_PRIVATE_BY_OWNER, &owner_prefix(owner))? {
            if let Some(n) = self.read::<PrivateNotification>(CF_PRIVATE, &id)? {
                if !n.deleted {
                    found.push(n);
                }
            }
        }
        Ok(found)
    }

    fn broadcasts(&self) -> Result<Vec<BroadcastNotification>, StoreError> {
        let mut found = Vec::new();
        for id in self.scan_prefix(CF_BROADCAST_ORDER, &[])? {
            if let Some(n) = self.read::<BroadcastNotification>(CF_BROADCAST, &id)? {
                found.push(n);
            }
        }
        Ok(found)
    }

    fn flag(&self, id: &str, owner: Option<&str>, effect: Effect) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let Some(mut notification) = self.read::<PrivateNotification>(CF_PRIVATE, id.as_bytes())?
        else {
            return Ok(false);
        };
        if owner.is_some_and(|owner| owner != notification.owner) {
            return Ok(false);
        }
        if notification.flag(effect) {
            self.put(CF_PRIVATE, id.as_bytes(), &notification)?;
        }
        Ok(true)
    }

    /// Writes a notification record plus its order-index entry under the
    /// next sequence. The sequence advances only once the batch commits.
    fn insert_ordered<T: Serialize>(
        &self,
        id: &str,
        record_cf: &str,
        record: &T,
        order_cf: &str,
        order_key: impl FnOnce(u64) -> Vec<u8>,
    ) -> Result<(), StoreError> {
        let mut next = self.write_lock.lock();
        if self.any_notification_exists(id)? {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        let sequence = *next;
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(record_cf)?, id.as_bytes(), encode(record)?);
        batch.put_cf(self.cf(order_cf)?, order_key(sequence), id.as_bytes());
        batch.put_cf(self.cf(CF_META)?, NEXT_SEQUENCE_KEY, encode(&(sequence + 1))?);
        self.write(batch)?;
        *next = sequence + 1;
        Ok(())
    }

    fn add_to_overlay(
        &self,
        account_id: &str,
        id: &str,
        effect: Effect,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let mut record = self
            .read::<OverlayRecord>(CF_OVERLAY, account_id.as_bytes())?
            .unwrap_or_else(|| OverlayRecord::empty(account_id));
        let inserted = record.insert(effect, id);
        if inserted {
            self.put(CF_OVERLAY, account_id.as_bytes(), &record)?;
        }
        Ok(inserted)
    }
}

fn owner_key(owner: &str, sequence: u64) -> Vec<u8> {
    let mut key = owner_prefix(owner);
    key.extend_from_slice(&sequence.to_be_bytes());
    key
}

fn owner_prefix(owner: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(owner.len() + 9);
    prefix.extend_from_slice(owner.as_bytes());
    prefix.push(0);
    prefix
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl AccountStore for RocksDbHubStore {
    async fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        let account_id = account_id.to_string();
        self.run(move |s| s.read(CF_ACCOUNTS, account_id.as_bytes()))
            .await
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        self.run(move |s| s.insert_account(account)).await
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        account: Account,
    ) -> Result<CasOutcome, StoreError> {
        self.run(move |s| s.swap_account(expected_version, account))
            .await
    }
}

#[async_trait]
impl NotificationStore for RocksDbHubStore {
    async fn undeleted_private_for(
        &self,
        owner: &str,
    ) -> Result<Vec<PrivateNotification>, StoreError> {
        let owner = owner.to_string();
        self.run(move |s| s.undeleted_private(&owner)).await
    }

    async fn all_broadcast(&self) -> Result<Vec<BroadcastNotification>, StoreError> {
        self.run(|s| s.broadcasts()).await
    }

    async fn broadcast_exists(&self, id: &str) -> Result<bool, StoreError> {
        let id = id.to_string();
        self.run(move |s| s.exists(CF_BROADCAST, id.as_bytes()))
            .await
    }

    async fn flag_private(
        &self,
        id: &str,
        owner: Option<&str>,
        effect: Effect,
    ) -> Result<bool, StoreError> {
        let id = id.to_string();
        let owner = owner.map(str::to_string);
        self.run(move |s| s.flag(&id, owner.as_deref(), effect))
            .await
    }

    async fn insert_broadcast(
        &self,
        notification: BroadcastNotification,
    ) -> Result<(), StoreError> {
        self.run(move |s| {
            s.insert_ordered(
                &notification.id,
                CF_BROADCAST,
                &notification,
                CF_BROADCAST_ORDER,
                |sequence| sequence.to_be_bytes().to_vec(),
            )
        })
        .await
    }

    async fn insert_private(&self, notification: PrivateNotification) -> Result<(), StoreError> {
        self.run(move |s| {
            s.insert_ordered(
                &notification.id,
                CF_PRIVATE,
                &notification,
                CF_PRIVATE_BY_OWNER,
                |sequence| owner_key(&notification.owner, sequence),
            )
        })
        .await
    }
}

#[async_trait]
impl OverlayStore for RocksDbHubStore {
    async fn load(&self, account_id: &str) -> Result<Option<OverlayRecord>, StoreError> {
        let account_id = account_id.to_string();
        self.run(move |s| s.read(CF_OVERLAY, account_id.as_bytes()))
            .await
    }

    async fn add(&self, account_id: &str, id: &str, effect: Effect) -> Result<bool, StoreError> {
        let account_id = account_id.to_string();
        let id = id.to_string();
        self.run(move |s| s.add_to_overlay(&account_id, &id, effect))
            .await
    }
}
