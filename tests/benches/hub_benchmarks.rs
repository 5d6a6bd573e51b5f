//! # Hub Benchmarks
//!
//! | Component | Path | Target |
//! |-----------|------|--------|
//! | hub-01 Account Actions | credit through the CAS write path | < 50µs |
//! | hub-02 Notification Overlay | feed merge over N items | < 1ms at 1000 |
//! | hub-runtime Dispatcher | gated profile lookup | < 100µs |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hub_01_account_actions::{
    Account, AccountAction, AccountActionApi, AccountService, AccountStore, ActionParams,
    InMemoryAccountStore,
};
use hub_02_notification_overlay::{
    merge_feed, BroadcastNotification, Classification, Effect, OverlayRecord, PrivateNotification,
};
use hub_runtime::{Dispatcher, HubConfig, HubContainer, HubStores};
use shared_types::{HmacCredentialGenerator, SystemTimeSource};
use tokio::runtime::Runtime;

// ============================================================================
// HUB-01: Account Actions
// ============================================================================

fn bench_apply_credit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = Arc::new(InMemoryAccountStore::new());
    rt.block_on(store.insert(Account::new("bench", "bench@example.com", "cred", 0, 0)))
        .unwrap();
    let service = AccountService::new(
        Arc::clone(&store),
        HmacCredentialGenerator::new("bench-secret"),
        SystemTimeSource,
    );

    let mut group = c.benchmark_group("hub-01-account-actions");
    group.bench_function("credit", |b| {
        b.iter(|| {
            rt.block_on(service.apply_action(
                "bench",
                AccountAction::Credit { amount: 1 },
                ActionParams::default(),
            ))
            .map(|account| black_box(account.version))
        })
    });
    group.finish();
}

// ============================================================================
// HUB-02: Feed Merge
// ============================================================================

fn feed_fixture(size: u64) -> (Vec<PrivateNotification>, Vec<BroadcastNotification>, OverlayRecord) {
    let private = (0..size / 2)
        .map(|i| PrivateNotification {
            id: format!("P{i}"),
            owner: "bench".to_string(),
            classification: Classification::Info,
            body: "private".to_string(),
            created_at: i * 2,
            expiry: None,
            read: i % 3 == 0,
            deleted: false,
        })
        .collect();
    let broadcast = (0..size / 2)
        .map(|i| BroadcastNotification {
            id: format!("G{i}"),
            classification: Classification::Warning,
            body: "broadcast".to_string(),
            created_at: i * 2 + 1,
            expiry: None,
        })
        .collect();
    let mut overlay = OverlayRecord::empty("bench");
    for i in (0..size / 2).step_by(4) {
        overlay.insert(Effect::Deleted, format!("G{i}"));
    }
    for i in (1..size / 2).step_by(4) {
        overlay.insert(Effect::Read, format!("G{i}"));
    }
    (private, broadcast, overlay)
}

fn bench_merge_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub-02-feed-merge");

    for size in [10u64, 100, 1_000] {
        let (private, broadcast, overlay) = feed_fixture(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("merge_feed", size), &size, |b, _| {
            b.iter(|| {
                black_box(merge_feed(private.clone(), broadcast.clone(), &overlay).len())
            })
        });
    }

    group.finish();
}

// ============================================================================
// HUB-RUNTIME: Dispatcher
// ============================================================================

fn bench_dispatch_profile(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut config = HubConfig::default();
    config.security.access_key = "bench-key".to_string();
    config.security.hmac_secret = "bench-secret".to_string();
    let container = HubContainer::with_stores(
        config,
        HubStores::in_memory(),
        Arc::new(SystemTimeSource),
    );
    let dispatcher = Dispatcher::new(Arc::new(container));

    let create = r#"{"key":"bench-key","request":{"op":"establish_session","session":{"id":"A1","email":"a@example.com","access-token":"t"}}}"#;
    rt.block_on(dispatcher.dispatch_line(create));
    let profile = r#"{"id":"1","key":"bench-key","request":{"op":"profile","account_id":"A1"}}"#;

    let mut group = c.benchmark_group("hub-runtime-dispatcher");
    group.bench_function("profile", |b| {
        b.iter(|| black_box(rt.block_on(dispatcher.dispatch_line(profile)).status))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_apply_credit,
    bench_merge_feed,
    bench_dispatch_profile,
);

criterion_main!(benches);
