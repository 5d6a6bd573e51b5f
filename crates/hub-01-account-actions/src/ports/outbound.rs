//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the account service.

use async_trait::async_trait;
use shared_types::StoreError;
use std::sync::Arc;

use crate::domain::Account;

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The record was replaced.
    Committed,
    /// Another writer got there first; the stored record is at `current`.
    VersionMismatch { current: u64 },
    /// No record with that identity exists.
    Missing,
}

/// Durable account records keyed by identity.
///
/// Production: `RocksDbAccountStore` (hub-runtime/adapters/storage)
/// Testing: `InMemoryAccountStore` (adapters/memory.rs)
///
/// ## Atomicity
///
/// `compare_and_swap` must check the stored version and replace the whole
/// record as one indivisible step. A caller abandoned mid-call either sees
/// its record fully committed or not at all.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts a new record. Fails with `StoreError::Duplicate` if the
    /// identity is already present.
    async fn insert(&self, account: Account) -> Result<(), StoreError>;

    /// Replaces the stored record with `account` only if the stored version
    /// equals `expected_version`.
    async fn compare_and_swap(
        &self,
        expected_version: u64,
        account: Account,
    ) -> Result<CasOutcome, StoreError>;
}

#[async_trait]
impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    async fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        (**self).get(account_id).await
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        (**self).insert(account).await
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        account: Account,
    ) -> Result<CasOutcome, StoreError> {
        (**self).compare_and_swap(expected_version, account).await
    }
}
