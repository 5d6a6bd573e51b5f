//! `AccountActionApi` implementation.

use async_trait::async_trait;
use shared_types::{CredentialGenerator, TimeSource};
use tracing::{debug, info};

use super::AccountService;
use crate::domain::{Account, AccountAction, AccountError, ActionParams, TransitionContext};
use crate::ports::inbound::AccountActionApi;
use crate::ports::outbound::AccountStore;

#[async_trait]
impl<S, C, T> AccountActionApi for AccountService<S, C, T>
where
    S: AccountStore,
    C: CredentialGenerator,
    T: TimeSource,
{
    async fn apply_action(
        &self,
        account_id: &str,
        action: AccountAction,
        params: ActionParams,
    ) -> Result<Account, AccountError> {
        let kind = action.kind();
        let credentials: &dyn CredentialGenerator = &self.credentials;

        let outcome = self
            .update_with(account_id, |account, now| {
                let ctx = TransitionContext { now, credentials };
                let entry = action.apply(account, &params, &ctx)?;
                Ok(entry.sequence)
            })
            .await;

        match outcome {
            Ok((account, sequence)) => {
                info!(
                    account_id,
                    action = %kind,
                    sequence,
                    balance = account.balance,
                    suspended = account.suspended,
                    "Account action applied"
                );
                Ok(account)
            }
            Err(err) => {
                debug!(account_id, action = %kind, error = %err, "Account action rejected");
                Err(err)
            }
        }
    }

    async fn profile(&self, account_id: &str) -> Result<Account, AccountError> {
        self.store
            .get(account_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()))
    }
}
