//! Shared fixtures for integration flows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hub_runtime::{DispatchResponse, Dispatcher, Envelope, HubConfig, HubContainer, HubStores};
use serde_json::{json, Value};
use shared_types::ManualTimeSource;

pub const ACCESS_KEY: &str = "integration-access-key";
pub const HMAC_SECRET: &str = "integration-hmac-secret";

/// A hub on in-memory stores with a manual clock.
pub struct TestHub {
    pub dispatcher: Dispatcher,
    pub clock: Arc<ManualTimeSource>,
    next_id: AtomicU64,
}

impl Default for TestHub {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHub {
    pub fn new() -> Self {
        let mut config = HubConfig::default();
        config.security.access_key = ACCESS_KEY.to_string();
        config.security.hmac_secret = HMAC_SECRET.to_string();
        Self::with_config(config)
    }

    pub fn with_config(config: HubConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(1_000));
        let container = HubContainer::with_stores(config, HubStores::in_memory(), clock.clone());
        Self {
            dispatcher: Dispatcher::new(Arc::new(container)),
            clock,
            next_id: AtomicU64::new(1),
        }
    }

    /// Sends `request` with the configured access key.
    pub async fn call(&self, request: Value) -> DispatchResponse {
        self.call_with_key(Some(ACCESS_KEY), request).await
    }

    pub async fn call_with_key(&self, key: Option<&str>, request: Value) -> DispatchResponse {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.dispatcher
            .dispatch(Envelope {
                id: Some(format!("req-{id}")),
                access_key: key.map(str::to_string),
                request,
            })
            .await
    }

    /// Creates an account through the session path; new accounts start
    /// with the default quota.
    pub async fn create_account(&self, id: &str) -> DispatchResponse {
        self.call(json!({
            "op": "establish_session",
            "session": {
                "id": id,
                "email": format!("{id}@example.com"),
                "access-token": format!("{id}-token"),
            }
        }))
        .await
    }

    pub async fn apply(&self, account_id: &str, params: Value) -> DispatchResponse {
        self.call(json!({
            "op": "apply_action",
            "account_id": account_id,
            "params": params,
        }))
        .await
    }

    pub async fn profile(&self, account_id: &str) -> DispatchResponse {
        self.call(json!({ "op": "profile", "account_id": account_id }))
            .await
    }

    pub async fn feed(&self, account_id: &str) -> DispatchResponse {
        self.call(json!({ "op": "list_feed", "account_id": account_id }))
            .await
    }

    pub async fn mark(&self, account_id: Option<&str>, id: &str, effect: &str) -> DispatchResponse {
        self.call(json!({
            "op": "mark",
            "account_id": account_id,
            "notification_id": id,
            "effect": effect,
        }))
        .await
    }

    pub async fn broadcast(&self, id: &str, created_at: u64) -> DispatchResponse {
        self.call(json!({
            "op": "publish_broadcast",
            "notification": {
                "id": id,
                "classification": "info",
                "body": format!("broadcast {id}"),
                "created_at": created_at,
            }
        }))
        .await
    }

    pub async fn private(&self, owner: &str, id: &str, created_at: u64) -> DispatchResponse {
        self.call(json!({
            "op": "publish_private",
            "owner": owner,
            "notification": {
                "id": id,
                "classification": "success",
                "body": format!("private {id}"),
                "created_at": created_at,
            }
        }))
        .await
    }
}

/// Ids of a successful `list_feed` body, in order.
pub fn feed_ids(response: &DispatchResponse) -> Vec<String> {
    response
        .body
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
