//! Root liveness endpoint.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "wine-recommender";

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "wine-recommender")]
    pub service: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = LivenessResponse)
    )
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}
