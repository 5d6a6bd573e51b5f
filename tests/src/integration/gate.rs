//! # Gate and Framing
//!
//! Access-key enforcement, malformed input and correlation ids.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::fixtures::{TestHub, ACCESS_KEY};

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_unauthorized() {
        let hub = TestHub::new();
        let create = json!({
            "op": "establish_session",
            "session": { "id": "A1", "email": "a@example.com", "access-token": "t" }
        });

        let missing = hub.call_with_key(None, create.clone()).await;
        assert_eq!(missing.status, 401);
        assert_eq!(missing.body["error"], "unauthorized");

        let wrong = hub.call_with_key(Some("not-the-key"), create.clone()).await;
        assert_eq!(wrong.status, 401);

        // Nothing ran behind the gate.
        assert_eq!(hub.profile("A1").await.status, 404);
    }

    #[tokio::test]
    async fn test_gate_runs_before_request_decoding() {
        let hub = TestHub::new();
        let response = hub
            .call_with_key(Some("wrong"), json!({ "op": "no_such_op" }))
            .await;
        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn test_malformed_requests_are_invalid() {
        let hub = TestHub::new();

        let unknown_op = hub.call(json!({ "op": "drop_tables" })).await;
        assert_eq!(unknown_op.status, 400);
        assert_eq!(unknown_op.body["error"], "invalid_argument");

        let missing_field = hub.call(json!({ "op": "profile" })).await;
        assert_eq!(missing_field.status, 400);

        let not_json = hub.dispatcher.dispatch_line("{ this is not json").await;
        assert_eq!(not_json.status, 400);
        assert!(not_json.id.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_line_echoes_correlation_id() {
        let hub = TestHub::new();
        let line = json!({
            "id": "corr-9",
            "key": ACCESS_KEY,
            "request": { "op": "profile", "account_id": "nobody" }
        })
        .to_string();

        let response = hub.dispatcher.dispatch_line(&line).await;
        assert_eq!(response.id.as_deref(), Some("corr-9"));
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_metrics_operation_reports_counters() {
        let hub = TestHub::new();
        hub.create_account("A1").await;
        hub.apply("A1", json!({ "action": "credit", "amount": 5 }))
            .await;

        let response = hub.call(json!({ "op": "metrics" })).await;
        assert_eq!(response.status, 200);
        let text = response.body["text"].as_str().unwrap();
        assert!(text.contains("hub_account_actions_applied_total"));
        assert!(text.contains("hub_requests_total"));
    }
}
