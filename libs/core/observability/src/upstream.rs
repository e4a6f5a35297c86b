//! Metrics for calls to external services (similarity index, OCR).

use metrics::{counter, histogram};
use std::time::Duration;

/// Upstream call metrics recorder
pub struct UpstreamMetrics;

impl UpstreamMetrics {
    /// Record one network call to `service`.
    pub fn record_call(service: &str, outcome: &str, duration: Duration) {
        counter!(
            "upstream_calls_total",
            "service" => service.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
        histogram!("upstream_call_duration_seconds", "service" => service.to_string())
            .record(duration.as_secs_f64());

        tracing::debug!(
            service = service,
            outcome = outcome,
            duration_ms = duration.as_millis() as u64,
            "Upstream call finished"
        );
    }

    /// Record a retry of a transient failure.
    pub fn record_retry(service: &str) {
        counter!("upstream_retries_total", "service" => service.to_string()).increment(1);
    }
}
