use axum::{Router, middleware, routing::get};
use observability::{metrics_handler, metrics_middleware};

pub mod health;
pub mod ocr;
pub mod wines;

/// Creates the API routes, mounted at the root.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .route("/", get(health::liveness))
        .merge(wines::router(state))
        .merge(ocr::router(state))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(metrics_middleware))
}
