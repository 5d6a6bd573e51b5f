//! Prometheus metrics for the Hub.
//!
//! All metrics follow the naming convention: `hub_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ACCOUNT METRICS (hub-01)
    // =========================================================================

    /// Account actions committed
    pub static ref ACTIONS_APPLIED: CounterVec = CounterVec::new(
        Opts::new("hub_account_actions_applied_total", "Account actions committed"),
        &["action"]
    ).expect("metric creation failed");

    /// Account actions rejected
    pub static ref ACTIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("hub_account_actions_rejected_total", "Account actions rejected"),
        &["action", "kind"]  // kind: not_found/invalid_argument/conflict/unavailable
    ).expect("metric creation failed");

    /// Writes abandoned after exhausting optimistic retries
    pub static ref ACCOUNT_CONFLICTS: Counter = Counter::new(
        "hub_account_conflicts_total",
        "Account writes abandoned after exhausting conflict retries"
    ).expect("metric creation failed");

    // =========================================================================
    // OVERLAY METRICS (hub-02)
    // =========================================================================

    /// Feed listings served
    pub static ref FEED_REQUESTS: Counter = Counter::new(
        "hub_overlay_feed_requests_total",
        "Feed listings served"
    ).expect("metric creation failed");

    /// Successful marks
    pub static ref MARKS: CounterVec = CounterVec::new(
        Opts::new("hub_overlay_marks_total", "Notifications marked"),
        &["effect", "scope"]  // scope: broadcast/private
    ).expect("metric creation failed");

    // =========================================================================
    // GATE METRICS
    // =========================================================================

    /// Requests refused by the access gate
    pub static ref UNAUTHORIZED_REQUESTS: Counter = Counter::new(
        "hub_gate_unauthorized_total",
        "Requests refused by the access gate"
    ).expect("metric creation failed");

    /// Requests dispatched by operation and status
    pub static ref REQUESTS: CounterVec = CounterVec::new(
        Opts::new("hub_requests_total", "Requests dispatched"),
        &["operation", "status"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Accounts
        Box::new(ACTIONS_APPLIED.clone()),
        Box::new(ACTIONS_REJECTED.clone()),
        Box::new(ACCOUNT_CONFLICTS.clone()),
        // Overlay
        Box::new(FEED_REQUESTS.clone()),
        Box::new(MARKS.clone()),
        // Gate
        Box::new(UNAUTHORIZED_REQUESTS.clone()),
        Box::new(REQUESTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
