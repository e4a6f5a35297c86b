//! Observability utilities for the wine recommender service.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Domain metrics for recommendations, label extraction and upstream calls
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, RecommendationMetrics};
//!
//! init_metrics()?;
//!
//! RecommendationMetrics::record("comprehensive", "success", elapsed);
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod labels;
pub mod middleware;
pub mod recommendations;
pub mod upstream;

pub use labels::LabelMetrics;
pub use middleware::metrics_middleware;
pub use recommendations::RecommendationMetrics;
pub use upstream::UpstreamMetrics;

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup; later calls return the same handle.
///
/// # Errors
/// Fails if another global metrics recorder is already installed.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Recommendation metrics
    describe_counter!(
        "wine_recommendations_total",
        "Recommendation requests by profile shape and outcome"
    );
    describe_histogram!(
        "wine_recommendation_duration_seconds",
        "End-to-end recommendation duration in seconds"
    );
    describe_histogram!(
        "wine_recommendation_results",
        "Number of wines returned per recommendation"
    );

    // Label extraction metrics
    describe_counter!(
        "label_extractions_total",
        "Label text extractions by outcome"
    );
    describe_histogram!(
        "label_image_bytes",
        "Size of uploaded label images in bytes"
    );

    // Upstream metrics
    describe_counter!(
        "upstream_calls_total",
        "Calls to external services by service and outcome"
    );
    describe_histogram!(
        "upstream_call_duration_seconds",
        "External call duration in seconds"
    );
    describe_counter!(
        "upstream_retries_total",
        "Retries of transient upstream failures"
    );
}
