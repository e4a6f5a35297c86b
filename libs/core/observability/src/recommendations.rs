//! Recommendation pipeline metrics.

use metrics::{counter, histogram};
use std::time::Duration;

/// Recommendation metrics recorder
pub struct RecommendationMetrics;

impl RecommendationMetrics {
    /// Record a finished recommendation request.
    ///
    /// `shape` is the detected profile shape, `outcome` a short status such as
    /// `success`, `invalid` or `upstream_error`.
    pub fn record(shape: &str, outcome: &str, duration: Duration) {
        counter!(
            "wine_recommendations_total",
            "shape" => shape.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
        histogram!("wine_recommendation_duration_seconds", "shape" => shape.to_string())
            .record(duration.as_secs_f64());
    }

    /// Record how many wines a successful recommendation returned.
    pub fn record_results(shape: &str, count: usize) {
        histogram!("wine_recommendation_results", "shape" => shape.to_string())
            .record(count as f64);
    }
}
