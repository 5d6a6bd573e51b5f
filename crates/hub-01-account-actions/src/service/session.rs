//! `SessionApi` implementation.
//!
//! Session calls create accounts and refresh their tokens. They share the
//! versioned write path with the state machine but never touch the audit log.

use async_trait::async_trait;
use shared_types::{CredentialGenerator, StoreError, TimeSource};
use tracing::{debug, info};

use super::{present, AccountService};
use crate::domain::{Account, AccountError, Precondition};
use crate::ports::inbound::{SessionApi, SessionOutcome, SessionRequest};
use crate::ports::outbound::{AccountStore, CasOutcome};

#[async_trait]
impl<S, C, T> SessionApi for AccountService<S, C, T>
where
    S: AccountStore,
    C: CredentialGenerator,
    T: TimeSource,
{
    async fn establish_session(
        &self,
        request: SessionRequest,
    ) -> Result<SessionOutcome, AccountError> {
        let id = present(request.id.as_deref())
            .ok_or(Precondition::MissingAccountId)?
            .to_string();
        let supplied_credential = present(request.credential.as_deref());
        let supplied_access_token = present(request.access_token.as_deref());

        let attempts = self.attempts();
        for _ in 0..attempts {
            let Some(mut account) = self.store.get(&id).await? else {
                let email = present(request.email.as_deref())
                    .ok_or(Precondition::MissingField("email"))?;
                let access_token =
                    supplied_access_token.ok_or(Precondition::MissingField("access-token"))?;

                let credential = self.credentials.generate(&id);
                let mut account = Account::new(
                    id.clone(),
                    email,
                    credential.clone(),
                    self.config.default_quota,
                    self.clock.now(),
                );
                account.access_token = Some(access_token.to_string());

                match self.store.insert(account).await {
                    Ok(()) => {
                        info!(account_id = %id, "Account created on first session");
                        return Ok(SessionOutcome::Created { credential });
                    }
                    Err(StoreError::Duplicate(_)) => {
                        debug!(account_id = %id, "Account created concurrently, refreshing instead");
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            };

            if supplied_credential.is_none() && supplied_access_token.is_none() {
                return Ok(SessionOutcome::LoggedIn {
                    credential: account.credential,
                });
            }

            let expected = account.version;
            if let Some(credential) = supplied_credential {
                account.credential = credential.to_string();
            }
            if let Some(token) = supplied_access_token {
                account.access_token = Some(token.to_string());
            }
            account.version = expected + 1;
            let credential = account.credential.clone();

            match self.store.compare_and_swap(expected, account).await? {
                CasOutcome::Committed => {
                    debug!(account_id = %id, "Session refreshed");
                    return Ok(if supplied_credential.is_some() {
                        SessionOutcome::Refreshed { credential }
                    } else {
                        SessionOutcome::LoggedIn { credential }
                    });
                }
                CasOutcome::VersionMismatch { .. } | CasOutcome::Missing => continue,
            }
        }

        Err(AccountError::Conflict {
            account_id: id,
            attempts,
        })
    }

    async fn lookup_credential(
        &self,
        account_id: Option<&str>,
        access_token: Option<String>,
    ) -> Result<String, AccountError> {
        let account_id = present(account_id).ok_or(Precondition::MissingAccountId)?;

        match present(access_token.as_deref()) {
            Some(token) => {
                let (account, ()) = self
                    .update_with(account_id, |account, _| {
                        account.access_token = Some(token.to_string());
                        Ok(())
                    })
                    .await?;
                Ok(account.credential)
            }
            None => self
                .store
                .get(account_id)
                .await?
                .map(|account| account.credential)
                .ok_or_else(|| AccountError::NotFound(account_id.to_string())),
        }
    }
}
