//! Prometheus metrics implementation.
//!
//! Delegates to the sibling `counters.rs` and `recorder.rs` modules, which
//! work against the global `metrics` crate registry. A single global
//! `PrometheusHandle` renders everything in Prometheus text format.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Empty because metrics are registered globally through `counter!()` and
/// `histogram!()`; the handle in `recorder.rs` owns collection and rendering.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_route_created(&self) {
        tracing::debug!("Recording route created event");
        super::increment_route_created();
    }

    fn record_api_key_issued(&self, role: &str) {
        super::increment_api_key_issued(role);
    }

    fn record_api_key_denied(&self, reason: &str) {
        super::increment_api_key_denied(reason);
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
