//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "error": "Missing required field(s): rating_mean",
        "code": "VALIDATION_ERROR",
        "details": { "fields": ["rating_mean"] }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Unsupported media",
    content_type = "application/json",
    example = json!({
        "error": "Image payload is empty",
        "code": "UNSUPPORTED_MEDIA"
    })
)]
pub struct UnsupportedMediaResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Feature vector has 6 dimensions, index expects 55",
        "code": "INVALID_VECTOR"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - upstream returned an error or malformed data",
    content_type = "application/json",
    example = json!({
        "error": "Similarity index returned status 500",
        "code": "UPSTREAM_BAD_RESPONSE"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable - upstream unreachable or timed out",
    content_type = "application/json",
    example = json!({
        "error": "Similarity index request timed out",
        "code": "UPSTREAM_UNAVAILABLE"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
