//! # Feed Flows
//!
//! Producers publish broadcast and private notifications; recipients read
//! the merged feed and mark items read or deleted.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::fixtures::{feed_ids, TestHub};

    #[tokio::test]
    async fn test_broadcast_read_then_deleted() {
        let hub = TestHub::new();
        assert_eq!(hub.broadcast("G1", 1_000).await.status, 201);

        let feed = hub.feed("A1").await;
        assert_eq!(feed.status, 200);
        assert_eq!(feed_ids(&feed), vec!["G1"]);
        assert_eq!(feed.body[0]["read"], false);
        assert_eq!(feed.body[0]["scope"], "broadcast");

        let marked = hub.mark(Some("A1"), "G1", "read").await;
        assert_eq!(marked.status, 200);
        assert_eq!(marked.body["effect"], "read");
        assert_eq!(hub.feed("A1").await.body[0]["read"], true);

        // Another recipient is unaffected.
        assert_eq!(hub.feed("A2").await.body[0]["read"], false);

        assert_eq!(hub.mark(Some("A1"), "G1", "deleted").await.status, 200);
        assert!(feed_ids(&hub.feed("A1").await).is_empty());
        assert_eq!(feed_ids(&hub.feed("A2").await), vec!["G1"]);
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_across_scopes() {
        let hub = TestHub::new();
        hub.broadcast("G1", 2_000).await;
        hub.private("A1", "P1", 1_500).await;
        hub.broadcast("G2", 1_000).await;
        hub.private("A2", "P2", 3_000).await;

        let feed = hub.feed("A1").await;
        assert_eq!(feed_ids(&feed), vec!["G1", "P1", "G2"]);
        assert_eq!(feed.body[1]["scope"], "private");
        assert_eq!(feed.body[1]["classification"], "success");
    }

    #[tokio::test]
    async fn test_equal_timestamps_list_private_first() {
        let hub = TestHub::new();
        hub.broadcast("G1", 1_000).await;
        hub.private("A1", "P1", 1_000).await;

        assert_eq!(feed_ids(&hub.feed("A1").await), vec!["P1", "G1"]);
    }

    #[tokio::test]
    async fn test_publish_defaults_created_at_to_clock() {
        let hub = TestHub::new();
        hub.clock.set(42_000);

        let published = hub
            .call(json!({
                "op": "publish_broadcast",
                "notification": { "id": "G7", "type": "warning", "message": "maintenance" }
            }))
            .await;
        assert_eq!(published.status, 201);
        assert_eq!(published.body["created_at"], 42_000);

        let feed = hub.feed("A1").await;
        assert_eq!(feed.body[0]["body"], "maintenance");
        assert_eq!(feed.body[0]["classification"], "warning");
    }

    #[tokio::test]
    async fn test_publish_rejects_duplicates_and_wrong_prefix() {
        let hub = TestHub::new();
        assert_eq!(hub.broadcast("G1", 1_000).await.status, 201);
        assert_eq!(hub.broadcast("G1", 1_000).await.status, 400);
        assert_eq!(hub.broadcast("X1", 1_000).await.status, 400);
        assert_eq!(hub.private("A1", "G9", 1_000).await.status, 400);
    }

    #[tokio::test]
    async fn test_private_marks() {
        let hub = TestHub::new();
        hub.private("A1", "P1", 1_000).await;
        hub.private("A1", "P2", 2_000).await;

        assert_eq!(hub.mark(Some("A1"), "P1", "read").await.status, 200);
        assert_eq!(hub.mark(Some("A1"), "P2", "delete").await.status, 200);

        let feed = hub.feed("A1").await;
        assert_eq!(feed_ids(&feed), vec!["P1"]);
        assert_eq!(feed.body[0]["read"], true);
    }

    #[tokio::test]
    async fn test_mark_failures() {
        let hub = TestHub::new();
        hub.broadcast("G1", 1_000).await;
        hub.private("A1", "P1", 1_000).await;

        let missing_private = hub.mark(Some("A1"), "P404", "read").await;
        assert_eq!(missing_private.status, 404);
        assert_eq!(missing_private.body["error"], "not_found");

        // Private items owned by someone else look missing.
        assert_eq!(hub.mark(Some("A2"), "P1", "read").await.status, 404);
        assert_eq!(hub.feed("A1").await.body[0]["read"], false);

        assert_eq!(hub.mark(Some("A1"), "G404", "read").await.status, 404);
        assert_eq!(hub.mark(None, "G1", "read").await.status, 400);
        assert_eq!(hub.mark(Some("A1"), "G1", "archive").await.status, 400);
    }

    #[tokio::test]
    async fn test_empty_account_feed_is_invalid() {
        let hub = TestHub::new();
        let response = hub.feed("").await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_repeated_mark_is_idempotent() {
        let hub = TestHub::new();
        hub.broadcast("G1", 1_000).await;

        for _ in 0..3 {
            assert_eq!(hub.mark(Some("A1"), "G1", "read").await.status, 200);
        }
        let feed = hub.feed("A1").await;
        assert_eq!(feed_ids(&feed), vec!["G1"]);
        assert_eq!(feed.body[0]["read"], true);
    }
}
