//! # Account Actions
//!
//! The five mutually exclusive transitions of the state machine.
//!
//! | action | precondition | mutation |
//! |--------|--------------|----------|
//! | credit | `amount > 0` | `balance += amount` |
//! | debit | `amount > 0` and `balance >= amount` | `balance -= amount` |
//! | suspend | justification present | `suspended = true` |
//! | reinstate | justification present | `suspended = false` |
//! | rotate-credential | justification present | `credential = generate()` |
//!
//! Every transition validates first and mutates second, so a rejected action
//! leaves the account untouched and appends nothing.

use serde::{Deserialize, Serialize};
use shared_types::{CredentialGenerator, Timestamp, SYSTEM_EXECUTOR};

use super::entities::{Account, AuditDetail, AuditDraft, AuditEntry, AuditKind};
use super::errors::Precondition;

/// Justification recorded for a credit when the caller gives none.
pub const DEFAULT_CREDIT_JUSTIFICATION: &str = "Quota added";

/// Justification recorded for a debit when the caller gives none.
pub const DEFAULT_DEBIT_JUSTIFICATION: &str = "Quota removed";

/// A closed set of account mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum AccountAction {
    Credit { amount: i64 },
    Debit { amount: i64 },
    Suspend { expiry: Option<Timestamp> },
    Reinstate { expiry: Option<Timestamp> },
    RotateCredential,
}

/// Caller-supplied annotations recorded alongside the mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    pub justification: Option<String>,
    pub executor: Option<String>,
}

impl ActionParams {
    pub fn justified(justification: impl Into<String>) -> Self {
        Self {
            justification: Some(justification.into()),
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = Some(executor.into());
        self
    }

    /// Justification with blank input treated as absent.
    fn justification(&self) -> Option<&str> {
        self.justification
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn executor(&self) -> String {
        self.executor
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(SYSTEM_EXECUTOR)
            .to_string()
    }
}

/// Inputs to a transition that come from the environment, not the caller.
pub struct TransitionContext<'a> {
    pub now: Timestamp,
    pub credentials: &'a dyn CredentialGenerator,
}

impl AccountAction {
    pub fn kind(&self) -> AuditKind {
        match self {
            AccountAction::Credit { .. } => AuditKind::Credit,
            AccountAction::Debit { .. } => AuditKind::Debit,
            AccountAction::Suspend { .. } => AuditKind::Suspend,
            AccountAction::Reinstate { .. } => AuditKind::Reinstate,
            AccountAction::RotateCredential => AuditKind::RotateCredential,
        }
    }

    /// Builds an action from its kind and the optional wire fields.
    ///
    /// A missing amount is treated as zero and therefore rejected by
    /// [`AccountAction::apply`].
    pub fn from_parts(kind: AuditKind, amount: Option<i64>, expiry: Option<Timestamp>) -> Self {
        match kind {
            AuditKind::Credit => AccountAction::Credit {
                amount: amount.unwrap_or(0),
            },
            AuditKind::Debit => AccountAction::Debit {
                amount: amount.unwrap_or(0),
            },
            AuditKind::Suspend => AccountAction::Suspend { expiry },
            AuditKind::Reinstate => AccountAction::Reinstate { expiry },
            AuditKind::RotateCredential => AccountAction::RotateCredential,
        }
    }

    /// Validates the precondition against `account`, applies the mutation and
    /// appends the audit entry.
    pub fn apply<'acc>(
        &self,
        account: &'acc mut Account,
        params: &ActionParams,
        ctx: &TransitionContext<'_>,
    ) -> Result<&'acc AuditEntry, Precondition> {
        let kind = self.kind();
        let justification = match (params.justification(), kind.requires_justification()) {
            (Some(text), _) => text.to_string(),
            (None, true) => return Err(Precondition::MissingJustification(kind)),
            (None, false) if kind == AuditKind::Credit => DEFAULT_CREDIT_JUSTIFICATION.to_string(),
            (None, false) => DEFAULT_DEBIT_JUSTIFICATION.to_string(),
        };

        let detail = match *self {
            AccountAction::Credit { amount } => {
                let amount = positive(amount)?;
                account.balance = account.balance.checked_add(amount).ok_or(
                    Precondition::BalanceOverflow {
                        balance: account.balance,
                        amount,
                    },
                )?;
                AuditDetail::Quantity(amount as i64)
            }
            AccountAction::Debit { amount } => {
                let requested = positive(amount)?;
                if account.balance < requested {
                    return Err(Precondition::InsufficientBalance {
                        balance: account.balance,
                        requested,
                    });
                }
                account.balance -= requested;
                AuditDetail::Quantity(-(requested as i64))
            }
            AccountAction::Suspend { expiry } => {
                account.suspended = true;
                AuditDetail::Expiry(expiry)
            }
            AccountAction::Reinstate { expiry } => {
                account.suspended = false;
                AuditDetail::Expiry(expiry)
            }
            AccountAction::RotateCredential => {
                let credential = ctx.credentials.generate(&account.id);
                account.credential = credential.clone();
                AuditDetail::Credential(credential)
            }
        };

        let draft = AuditDraft {
            kind,
            justification,
            detail,
            executor: params.executor(),
        };
        Ok(account.append_audit(draft, ctx.now))
    }
}

fn positive(amount: i64) -> Result<u64, Precondition> {
    if amount <= 0 {
        return Err(Precondition::NonPositiveAmount(amount));
    }
    Ok(amount as u64)
}

/// Boundary form of an action request, as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default, alias = "justification")]
    pub reason: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,
    #[serde(default)]
    pub expiry: Option<Timestamp>,
}

impl ActionRequest {
    /// Resolves the action name into the closed action type.
    pub fn parse(self) -> Result<(AccountAction, ActionParams), Precondition> {
        let kind: AuditKind = self.action.trim().parse()?;
        let action = AccountAction::from_parts(kind, self.amount, self.expiry);
        let params = ActionParams {
            justification: self.reason,
            executor: self.executor,
        };
        Ok((action, params))
    }
}
