pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Every failure leaves the service with the same body:
/// - `error`: Human-readable error message
/// - `code`: Machine-readable error identifier (e.g., "VALIDATION_ERROR")
/// - `details`: Optional structured details (e.g., offending field names)
///
/// # JSON Example
///
/// ```json
/// {
///   "error": "Missing required field(s): rating_mean",
///   "code": "VALIDATION_ERROR",
///   "details": { "fields": ["rating_mean"] }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error identifier for programmatic handling
    pub code: ErrorCode,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own errors into this type so that status
/// mapping, logging level and body shape live in one place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Multipart rejection: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::InvalidJson(_)
            | AppError::BadRequest(_)
            | AppError::UnsupportedMedia(_) => StatusCode::BAD_REQUEST,
            AppError::MultipartRejection(e) => e.status(),
            AppError::Multipart(e) => e.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::InvalidVector(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation { message, fields } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    fields = ?fields,
                    "Validation error: {}",
                    message
                );
                ErrorResponse::new(ErrorCode::ValidationError, message)
                    .with_details(serde_json::json!({ "fields": fields }))
            }
            AppError::InvalidJson(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidJson.code(), "Invalid JSON: {}", msg);
                ErrorResponse::new(ErrorCode::InvalidJson, msg)
            }
            AppError::MultipartRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::MultipartError.code(),
                    "Multipart rejection: {:?}",
                    e
                );
                ErrorResponse::new(ErrorCode::MultipartError, e.body_text())
            }
            AppError::Multipart(e) => {
                tracing::warn!(
                    error_code = ErrorCode::MultipartError.code(),
                    "Multipart error: {:?}",
                    e
                );
                ErrorResponse::new(ErrorCode::MultipartError, e.body_text())
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                ErrorResponse::new(ErrorCode::BadRequest, msg)
            }
            AppError::UnsupportedMedia(msg) => {
                tracing::info!(
                    error_code = ErrorCode::UnsupportedMedia.code(),
                    "Unsupported media: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::UnsupportedMedia, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                ErrorResponse::new(ErrorCode::NotFound, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::InternalError, msg)
            }
            AppError::InvalidVector(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InvalidVector.code(),
                    "Invalid vector: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::InvalidVector, msg)
            }
            AppError::BadGateway(msg) => {
                tracing::error!(
                    error_code = ErrorCode::UpstreamBadResponse.code(),
                    "Bad gateway: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::UpstreamBadResponse, msg)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::UpstreamUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::UpstreamUnavailable, msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::NOT_FOUND,
///     "No such route".to_string(),
///     ErrorCode::NotFound,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
