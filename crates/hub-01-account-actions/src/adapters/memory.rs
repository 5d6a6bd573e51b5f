//! In-memory account store.
//!
//! Version check and replacement happen under one write lock, which makes
//! `compare_and_swap` linearizable within the process.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::StoreError;
use std::collections::HashMap;

use crate::domain::Account;
use crate::ports::outbound::{AccountStore, CasOutcome};

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, bypassing the duplicate check. Test and fixture use.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let map = accounts
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();
        Self {
            accounts: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().get(account_id).cloned())
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.id) {
            return Err(StoreError::Duplicate(account.id));
        }
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        account: Account,
    ) -> Result<CasOutcome, StoreError> {
        let mut accounts = self.accounts.write();
        let Some(stored) = accounts.get_mut(&account.id) else {
            return Ok(CasOutcome::Missing);
        };
        if stored.version != expected_version {
            return Ok(CasOutcome::VersionMismatch {
                current: stored.version,
            });
        }
        *stored = account;
        Ok(CasOutcome::Committed)
    }
}
