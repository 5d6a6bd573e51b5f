//! # Account Flows
//!
//! Sessions create accounts; actions mutate them and extend the audit trail.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::fixtures::TestHub;

    // =============================================================================
    // SESSIONS
    // =============================================================================

    #[tokio::test]
    async fn test_first_session_creates_account_with_default_quota() {
        let hub = TestHub::new();

        let created = hub.create_account("A1").await;
        assert_eq!(created.status, 201);
        assert_eq!(created.body["outcome"], "created");
        let credential = created.body["credential"].as_str().unwrap().to_string();
        assert_eq!(credential.len(), 64);

        let profile = hub.profile("A1").await;
        assert_eq!(profile.status, 200);
        assert_eq!(profile.body["balance"], 500);
        assert_eq!(profile.body["suspended"], false);
        assert_eq!(profile.body["credential"], credential.as_str());
        assert_eq!(profile.body["audit_log"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_second_session_logs_in() {
        let hub = TestHub::new();
        hub.create_account("A1").await;

        let again = hub.create_account("A1").await;
        assert_eq!(again.status, 200);
        assert_eq!(again.body["outcome"], "logged_in");
    }

    #[tokio::test]
    async fn test_new_account_requires_email() {
        let hub = TestHub::new();
        let response = hub
            .call(json!({
                "op": "establish_session",
                "session": { "id": "A1", "access-token": "t" }
            }))
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(hub.profile("A1").await.status, 404);
    }

    #[tokio::test]
    async fn test_lookup_credential() {
        let hub = TestHub::new();
        let created = hub.create_account("A1").await;

        let found = hub
            .call(json!({ "op": "lookup_credential", "account_id": "A1" }))
            .await;
        assert_eq!(found.status, 200);
        assert_eq!(found.body["credential"], created.body["credential"]);

        let missing = hub
            .call(json!({ "op": "lookup_credential", "account_id": "A9" }))
            .await;
        assert_eq!(missing.status, 404);
    }

    // =============================================================================
    // ACTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_credit_then_oversized_debit() {
        let hub = TestHub::new();
        hub.create_account("A1").await;

        let credited = hub
            .apply("A1", json!({ "action": "credit", "amount": 100 }))
            .await;
        assert_eq!(credited.status, 200);
        assert_eq!(credited.body["balance"], 600);
        let log = credited.body["audit_log"].as_array().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["sequence"], 1);
        assert_eq!(log[0]["kind"], "credit");
        assert_eq!(log[0]["justification"], "Quota added");
        assert_eq!(log[0]["executor"], "system");

        let rejected = hub
            .apply("A1", json!({ "action": "debit", "amount": 700 }))
            .await;
        assert_eq!(rejected.status, 400);
        assert_eq!(rejected.body["error"], "invalid_argument");

        let profile = hub.profile("A1").await;
        assert_eq!(profile.body["balance"], 600);
        assert_eq!(profile.body["audit_log"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_credit_is_rejected() {
        let hub = TestHub::new();
        hub.create_account("A1").await;

        for amount in [0, -5] {
            let response = hub
                .apply("A1", json!({ "action": "credit", "amount": amount }))
                .await;
            assert_eq!(response.status, 400);
        }
        let response = hub.apply("A1", json!({ "action": "credit" })).await;
        assert_eq!(response.status, 400);

        let profile = hub.profile("A1").await;
        assert_eq!(profile.body["balance"], 500);
        assert_eq!(profile.body["version"], 0);
    }

    #[tokio::test]
    async fn test_suspend_and_reinstate_with_legacy_names() {
        let hub = TestHub::new();
        hub.create_account("A1").await;
        hub.clock.set(5_000);

        let banned = hub
            .apply(
                "A1",
                json!({ "action": "ban", "reason": "abuse", "executor": "ops", "expiry": 9_000 }),
            )
            .await;
        assert_eq!(banned.status, 200);
        assert_eq!(banned.body["suspended"], true);
        let entry = &banned.body["audit_log"][0];
        assert_eq!(entry["kind"], "suspend");
        assert_eq!(entry["executor"], "ops");
        assert_eq!(entry["timestamp"], 5_000);
        assert_eq!(entry["detail"]["expiry"], 9_000);

        let missing_reason = hub.apply("A1", json!({ "action": "unban" })).await;
        assert_eq!(missing_reason.status, 400);

        let unbanned = hub
            .apply("A1", json!({ "action": "unban", "reason": "appeal" }))
            .await;
        assert_eq!(unbanned.body["suspended"], false);
        assert_eq!(unbanned.body["audit_log"][1]["sequence"], 2);
    }

    #[tokio::test]
    async fn test_rotate_credential_requires_justification() {
        let hub = TestHub::new();
        let created = hub.create_account("A1").await;

        let rejected = hub
            .apply("A1", json!({ "action": "rotate-credential", "reason": "   " }))
            .await;
        assert_eq!(rejected.status, 400);
        assert_eq!(
            hub.profile("A1").await.body["audit_log"]
                .as_array()
                .unwrap()
                .len(),
            0
        );

        let rotated = hub
            .apply("A1", json!({ "action": "updatetoken", "reason": "leaked" }))
            .await;
        assert_eq!(rotated.status, 200);
        // Same secret and identity yield the same generated credential.
        assert_eq!(rotated.body["credential"], created.body["credential"]);
        assert_eq!(
            rotated.body["audit_log"][0]["detail"]["credential"],
            created.body["credential"]
        );
    }

    #[tokio::test]
    async fn test_unknown_action_and_account() {
        let hub = TestHub::new();
        hub.create_account("A1").await;

        let unknown = hub
            .apply("A1", json!({ "action": "promote", "reason": "x" }))
            .await;
        assert_eq!(unknown.status, 400);

        let missing = hub
            .apply("A9", json!({ "action": "credit", "amount": 1 }))
            .await;
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["error"], "not_found");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_credits_keep_audit_contiguous() {
        let hub = Arc::new(TestHub::new());
        hub.create_account("A1").await;

        let handles: Vec<_> = (0..24)
            .map(|_| {
                let hub = Arc::clone(&hub);
                tokio::spawn(async move {
                    hub.apply("A1", json!({ "action": "credit", "amount": 1 }))
                        .await
                        .status
                })
            })
            .collect();

        let mut committed = 0u64;
        for handle in handles {
            match handle.await.unwrap() {
                200 => committed += 1,
                409 => {}
                other => panic!("unexpected status {other}"),
            }
        }

        let profile = hub.profile("A1").await;
        let log = profile.body["audit_log"].as_array().unwrap();
        assert_eq!(log.len() as u64, committed);
        assert_eq!(profile.body["balance"].as_u64().unwrap(), 500 + committed);
        for (i, entry) in log.iter().enumerate() {
            assert_eq!(entry["sequence"].as_u64().unwrap(), i as u64 + 1);
        }
    }
}
