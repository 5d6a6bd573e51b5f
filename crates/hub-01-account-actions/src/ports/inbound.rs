//! # Inbound Ports (Driving Ports)
//!
//! Public APIs exposed by the account component.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountAction, AccountError, ActionParams, ActionRequest, Account};

/// The Account Action State Machine.
#[async_trait]
pub trait AccountActionApi: Send + Sync {
    /// Applies one action atomically and returns the updated account.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no such account
    /// - `InvalidArgument`: precondition violated; nothing is persisted
    /// - `Conflict`: every optimistic attempt lost to a concurrent writer
    /// - `Unavailable`: store failure
    async fn apply_action(
        &self,
        account_id: &str,
        action: AccountAction,
        params: ActionParams,
    ) -> Result<Account, AccountError>;

    /// Parses a boundary request and applies it.
    async fn apply_request(
        &self,
        account_id: &str,
        request: ActionRequest,
    ) -> Result<Account, AccountError> {
        let (action, params) = request.parse()?;
        self.apply_action(account_id, action, params).await
    }

    /// Current snapshot of an account.
    async fn profile(&self, account_id: &str) -> Result<Account, AccountError>;
}

/// Session establishment input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// External access token from the identity provider.
    #[serde(default, rename = "access-token", alias = "access_token")]
    pub access_token: Option<String>,
    /// Credential to install on an existing account.
    #[serde(default, alias = "token")]
    pub credential: Option<String>,
}

/// Result of a session call; every variant carries the credential now in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// A new account was created with a generated credential.
    Created { credential: String },
    /// An existing account had its credential replaced.
    Refreshed { credential: String },
    /// An existing account kept its credential.
    LoggedIn { credential: String },
}

impl SessionOutcome {
    pub fn credential(&self) -> &str {
        match self {
            SessionOutcome::Created { credential }
            | SessionOutcome::Refreshed { credential }
            | SessionOutcome::LoggedIn { credential } => credential,
        }
    }
}

/// Session lifecycle: the only writer of accounts besides the state machine.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Creates the account on first contact, otherwise refreshes its tokens.
    async fn establish_session(&self, request: SessionRequest)
        -> Result<SessionOutcome, AccountError>;

    /// Returns the stored credential, refreshing the external access token
    /// when one is supplied.
    async fn lookup_credential(
        &self,
        account_id: Option<&str>,
        access_token: Option<String>,
    ) -> Result<String, AccountError>;
}
