//! # Request Dispatcher
//!
//! Gates and routes one request envelope to a component and maps the
//! outcome onto a response status.
//!
//! ## Flow
//!
//! ```text
//! line ──parse──► Envelope ──AccessGate──► HubRequest ──► component API
//!                    │            │              │              │
//!                   400          401            400      200/201/4xx/503
//! ```
//!
//! The access key is checked before the request body is even decoded, so an
//! unauthenticated caller learns nothing about request validity and no core
//! operation runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use hub_01_account_actions::{AccountError, ActionRequest, AuditKind, SessionOutcome, SessionRequest};
use hub_02_notification_overlay::{is_broadcast_id, Effect, NewNotification, OverlayError};
use hub_telemetry::{
    gather_metrics, ACCOUNT_CONFLICTS, ACTIONS_APPLIED, ACTIONS_REJECTED, FEED_REQUESTS, MARKS,
    REQUESTS, UNAUTHORIZED_REQUESTS,
};
use shared_types::ErrorKind;

use crate::container::HubContainer;

/// One framed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Caller correlation id, echoed in the response.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "key")]
    pub access_key: Option<String>,
    /// Decoded into a [`HubRequest`] only after the gate passes.
    pub request: Value,
}

/// Every operation the hub exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HubRequest {
    ApplyAction {
        account_id: String,
        params: ActionRequest,
    },
    Profile {
        account_id: String,
    },
    EstablishSession {
        session: SessionRequest,
    },
    LookupCredential {
        #[serde(default)]
        account_id: Option<String>,
        #[serde(default)]
        access_token: Option<String>,
    },
    ListFeed {
        account_id: String,
    },
    Mark {
        #[serde(default)]
        account_id: Option<String>,
        notification_id: String,
        effect: String,
    },
    PublishBroadcast {
        notification: NewNotification,
    },
    PublishPrivate {
        owner: String,
        notification: NewNotification,
    },
    Metrics,
}

impl HubRequest {
    /// Metric label for the operation.
    pub fn operation(&self) -> &'static str {
        match self {
            HubRequest::ApplyAction { .. } => "apply_action",
            HubRequest::Profile { .. } => "profile",
            HubRequest::EstablishSession { .. } => "establish_session",
            HubRequest::LookupCredential { .. } => "lookup_credential",
            HubRequest::ListFeed { .. } => "list_feed",
            HubRequest::Mark { .. } => "mark",
            HubRequest::PublishBroadcast { .. } => "publish_broadcast",
            HubRequest::PublishPrivate { .. } => "publish_private",
            HubRequest::Metrics => "metrics",
        }
    }
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: u16,
    pub body: Value,
}

impl DispatchResponse {
    fn ok(id: Option<String>, status: u16, body: Value) -> Self {
        Self { id, status, body }
    }

    fn failure(id: Option<String>, failure: Failure) -> Self {
        Self {
            id,
            status: status_for(failure.kind),
            body: serde_json::json!({
                "error": failure.kind,
                "message": failure.message,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response status for a failure kind.
pub fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::InvalidArgument => 400,
        ErrorKind::Unauthorized => 401,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::Unavailable => 503,
    }
}

#[derive(Debug)]
struct Failure {
    kind: ErrorKind,
    message: String,
}

impl Failure {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<AccountError> for Failure {
    fn from(err: AccountError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<OverlayError> for Failure {
    fn from(err: OverlayError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, Failure> {
    serde_json::to_value(value)
        .map_err(|e| Failure::new(ErrorKind::Unavailable, format!("response encoding: {e}")))
}

/// Routes gated requests to the container's services.
#[derive(Clone)]
pub struct Dispatcher {
    container: Arc<HubContainer>,
}

impl Dispatcher {
    pub fn new(container: Arc<HubContainer>) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &HubContainer {
        &self.container
    }

    /// Parses one newline-delimited JSON envelope and dispatches it.
    pub async fn dispatch_line(&self, line: &str) -> DispatchResponse {
        match serde_json::from_str::<Envelope>(line) {
            Ok(envelope) => self.dispatch(envelope).await,
            Err(e) => {
                debug!(error = %e, "Malformed envelope");
                DispatchResponse::failure(
                    None,
                    Failure::new(ErrorKind::InvalidArgument, format!("malformed envelope: {e}")),
                )
            }
        }
    }

    pub async fn dispatch(&self, envelope: Envelope) -> DispatchResponse {
        let Envelope {
            id,
            access_key,
            request,
        } = envelope;

        if !self.container.gate.authorize(access_key.as_deref()) {
            UNAUTHORIZED_REQUESTS.inc();
            warn!(request_id = ?id, "Request refused by access gate");
            return DispatchResponse::failure(
                id,
                Failure::new(ErrorKind::Unauthorized, "access key rejected"),
            );
        }

        let request: HubRequest = match serde_json::from_value(request) {
            Ok(request) => request,
            Err(e) => {
                return DispatchResponse::failure(
                    id,
                    Failure::new(ErrorKind::InvalidArgument, format!("malformed request: {e}")),
                );
            }
        };

        let operation = request.operation();
        let response = match self.execute(request).await {
            Ok((status, body)) => DispatchResponse::ok(id, status, body),
            Err(failure) => {
                debug!(
                    operation,
                    kind = failure.kind.as_str(),
                    message = %failure.message,
                    "Request failed"
                );
                DispatchResponse::failure(id, failure)
            }
        };

        let status = response.status.to_string();
        REQUESTS.with_label_values(&[operation, status.as_str()]).inc();
        response
    }

    async fn execute(&self, request: HubRequest) -> Result<(u16, Value), Failure> {
        let c = &self.container;
        match request {
            HubRequest::ApplyAction { account_id, params } => {
                let label = params
                    .action
                    .trim()
                    .parse::<AuditKind>()
                    .map(|kind| kind.as_str())
                    .unwrap_or("unknown");

                match c.actions.apply_request(&account_id, params).await {
                    Ok(account) => {
                        ACTIONS_APPLIED.with_label_values(&[label]).inc();
                        Ok((200, to_body(&account)?))
                    }
                    Err(err) => {
                        let kind = err.kind();
                        ACTIONS_REJECTED
                            .with_label_values(&[label, kind.as_str()])
                            .inc();
                        if kind == ErrorKind::Conflict {
                            ACCOUNT_CONFLICTS.inc();
                        }
                        Err(err.into())
                    }
                }
            }

            HubRequest::Profile { account_id } => {
                let account = c.actions.profile(&account_id).await?;
                Ok((200, to_body(&account)?))
            }

            HubRequest::EstablishSession { session } => {
                let outcome = c.sessions.establish_session(session).await?;
                let status = match outcome {
                    SessionOutcome::Created { .. } => 201,
                    SessionOutcome::Refreshed { .. } | SessionOutcome::LoggedIn { .. } => 200,
                };
                Ok((status, to_body(&outcome)?))
            }

            HubRequest::LookupCredential {
                account_id,
                access_token,
            } => {
                let credential = c
                    .sessions
                    .lookup_credential(account_id.as_deref(), access_token)
                    .await?;
                Ok((200, serde_json::json!({ "credential": credential })))
            }

            HubRequest::ListFeed { account_id } => {
                let feed = c.feed.list_feed(&account_id).await?;
                FEED_REQUESTS.inc();
                Ok((200, to_body(&feed)?))
            }

            HubRequest::Mark {
                account_id,
                notification_id,
                effect,
            } => {
                let effect: Effect = effect.trim().parse().map_err(OverlayError::from)?;
                c.feed
                    .mark(account_id.as_deref(), &notification_id, effect)
                    .await?;
                let scope = if is_broadcast_id(&notification_id) {
                    "broadcast"
                } else {
                    "private"
                };
                MARKS.with_label_values(&[effect.as_str(), scope]).inc();
                Ok((
                    200,
                    serde_json::json!({ "notification_id": notification_id, "effect": effect }),
                ))
            }

            HubRequest::PublishBroadcast { notification } => {
                let id = notification.id.clone();
                let created_at = c.publisher.publish_broadcast(notification).await?;
                Ok((201, serde_json::json!({ "id": id, "created_at": created_at })))
            }

            HubRequest::PublishPrivate {
                owner,
                notification,
            } => {
                let id = notification.id.clone();
                let created_at = c.publisher.publish_private(&owner, notification).await?;
                Ok((201, serde_json::json!({ "id": id, "created_at": created_at })))
            }

            HubRequest::Metrics => {
                let text = gather_metrics()
                    .map_err(|e| Failure::new(ErrorKind::Unavailable, e.to_string()))?;
                Ok((200, serde_json::json!({ "text": text })))
            }
        }
    }
}
