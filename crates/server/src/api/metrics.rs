//! Prometheus metrics recording.

use metrics::{counter, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a completed retrieval and its result count.
pub fn record_retrieval(filtered: bool, returned: usize, duration: Duration) {
    let labels = [("filtered", filtered.to_string())];
    counter!("extknowledge_retrievals_total", &labels).increment(1);
    histogram!("extknowledge_retrieval_records", &labels).record(returned as f64);
    histogram!("extknowledge_retrieval_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a failed retrieval by error kind (`not_found`, `engine`).
pub fn record_retrieval_failure(kind: &'static str) {
    counter!("extknowledge_retrieval_failures_total", "kind" => kind).increment(1);
}
