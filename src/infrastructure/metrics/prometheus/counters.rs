use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for created routes.
pub fn increment_route_created() {
    counter!("routes_created_total").increment(1);
}

/// Increment the issued-key counter, labelled by role.
pub fn increment_api_key_issued(role: &str) {
    counter!("api_keys_issued_total", "role" => role.to_string()).increment(1);
}

/// Increment the denied-key counter, labelled by reason.
pub fn increment_api_key_denied(reason: &str) {
    counter!("api_keys_denied_total", "reason" => reason.to_string()).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
