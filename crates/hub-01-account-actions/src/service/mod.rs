//! # Account Service
//!
//! Application service implementing `AccountActionApi` and `SessionApi`.
//!
//! ## Concurrency
//!
//! Every write is an optimistic read-modify-write against one consistent
//! snapshot:
//!
//! 1. read the account and remember its `version`
//! 2. run the mutation on the local copy
//! 3. `compare_and_swap(version, copy with version + 1)`
//! 4. on `VersionMismatch`, start again from a fresh read
//!
//! Two concurrent actions on one account therefore can never both compute the
//! same audit sequence: one of them loses the swap and re-applies on top of
//! the other's committed state. After `max_conflict_retries` lost races the
//! caller receives `Conflict`.

mod actions;
mod session;

use shared_types::{CredentialGenerator, TimeSource, Timestamp};
use tracing::{debug, warn};

use crate::domain::{Account, AccountConfig, AccountError};
use crate::ports::outbound::{AccountStore, CasOutcome};

/// The account service.
pub struct AccountService<S, C, T>
where
    S: AccountStore,
    C: CredentialGenerator,
    T: TimeSource,
{
    pub(crate) store: S,
    pub(crate) credentials: C,
    pub(crate) clock: T,
    pub(crate) config: AccountConfig,
}

impl<S, C, T> AccountService<S, C, T>
where
    S: AccountStore,
    C: CredentialGenerator,
    T: TimeSource,
{
    pub fn new(store: S, credentials: C, clock: T) -> Self {
        Self::with_config(store, credentials, clock, AccountConfig::default())
    }

    pub fn with_config(store: S, credentials: C, clock: T, config: AccountConfig) -> Self {
        Self {
            store,
            credentials,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.config.max_conflict_retries.saturating_add(1)
    }

    /// Runs `mutate` against a fresh snapshot until the conditional write
    /// commits, returning the committed account and the mutation's result.
    ///
    /// Errors from `mutate` abort immediately without writing.
    pub(crate) async fn update_with<R, F>(
        &self,
        account_id: &str,
        mut mutate: F,
    ) -> Result<(Account, R), AccountError>
    where
        R: Send,
        F: FnMut(&mut Account, Timestamp) -> Result<R, AccountError> + Send,
    {
        let attempts = self.attempts();
        for attempt in 1..=attempts {
            let mut account = self
                .store
                .get(account_id)
                .await?
                .ok_or_else(|| AccountError::NotFound(account_id.to_string()))?;

            let expected = account.version;
            let result = mutate(&mut account, self.clock.now())?;
            account.version = expected + 1;

            match self.store.compare_and_swap(expected, account.clone()).await? {
                CasOutcome::Committed => return Ok((account, result)),
                CasOutcome::VersionMismatch { current } => {
                    debug!(
                        account_id,
                        attempt,
                        expected,
                        current,
                        "Concurrent account update, retrying from fresh read"
                    );
                }
                CasOutcome::Missing => {
                    return Err(AccountError::NotFound(account_id.to_string()));
                }
            }
        }

        warn!(account_id, attempts, "Account update retries exhausted");
        Err(AccountError::Conflict {
            account_id: account_id.to_string(),
            attempts,
        })
    }
}

/// Trims and drops blank optional inputs.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
