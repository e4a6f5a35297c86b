use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use axum_helpers::errors::responses::{
    BadGatewayResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    ServiceUnavailableResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{WineError, WineResult};
use crate::index::SimilarityIndex;
use crate::models::{LegacyProfile, WineType, WinesResponse};
use crate::service::WineService;

pub const TAG: &str = "wines";

/// OpenAPI documentation for the recommendation endpoints
#[derive(OpenApi)]
#[openapi(
    paths(recommend, recommend_alias, recommend_legacy),
    components(
        schemas(WinesResponse, LegacyProfile, WineType),
        responses(
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            BadGatewayResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "Wine recommendations from a taste profile")
    )
)]
pub struct ApiDoc;

/// Create the wines router
pub fn router<I: SimilarityIndex + 'static>(service: WineService<I>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/wines", post(recommend::<I>))
        .route("/wines/recommend", post(recommend_alias::<I>))
        .route("/wines/legacy", post(recommend_legacy::<I>))
        .with_state(shared_service)
}

/// Parse the raw body; an empty body or a bare `null` counts as missing.
fn parse_body(body: &Bytes) -> WineResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(WineError::MalformedBody("Missing request body.".to_string()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Err(WineError::MalformedBody("Missing request body.".to_string())),
        Ok(value) => Ok(value),
        Err(e) => Err(WineError::MalformedBody(format!("Request body is not valid JSON: {}", e))),
    }
}

/// Recommend wines for a comprehensive or legacy profile
///
/// The shape is detected from the payload keys.
#[utoipa::path(
    post,
    path = "/wines",
    tag = TAG,
    request_body(
        content = Object,
        description = "55-field comprehensive profile or 4-field legacy profile",
        example = json!({"type": "Red", "body": 4, "dryness": 3, "abv": 13.5})
    ),
    responses(
        (status = 200, description = "Recommended wines, closest first", body = WinesResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn recommend<I: SimilarityIndex>(
    State(service): State<Arc<WineService<I>>>,
    body: Bytes,
) -> WineResult<Json<WinesResponse>> {
    let payload = parse_body(&body)?;
    let result = service.recommend(&payload).await?;
    Ok(Json(result.into()))
}

/// Alias of `POST /wines`
#[utoipa::path(
    post,
    path = "/wines/recommend",
    tag = TAG,
    request_body(content = Object, description = "Comprehensive or legacy profile"),
    responses(
        (status = 200, description = "Recommended wines, closest first", body = WinesResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn recommend_alias<I: SimilarityIndex>(
    state: State<Arc<WineService<I>>>,
    body: Bytes,
) -> WineResult<Json<WinesResponse>> {
    recommend(state, body).await
}

/// Recommend wines for a legacy profile
#[utoipa::path(
    post,
    path = "/wines/legacy",
    tag = TAG,
    request_body = LegacyProfile,
    responses(
        (status = 200, description = "Recommended wines, closest first", body = WinesResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn recommend_legacy<I: SimilarityIndex>(
    State(service): State<Arc<WineService<I>>>,
    body: Bytes,
) -> WineResult<Json<WinesResponse>> {
    let payload = parse_body(&body)?;
    let result = service.recommend_legacy(&payload).await?;
    Ok(Json(result.into()))
}
