use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a "route created" event.
    fn record_route_created(&self);

    /// Record a successful API key issuance for the given role.
    fn record_api_key_issued(&self, role: &str);

    /// Record a denied API key request, labelled by denial reason.
    fn record_api_key_denied(&self, reason: &str);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
