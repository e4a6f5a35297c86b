//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Request body is missing or is not valid JSON
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// Generic malformed request
    BadRequest,

    /// HTTP method not supported by the route
    MethodNotAllowed,

    /// Uploaded media is empty or not a recognised format
    UnsupportedMedia,

    /// Multipart form could not be read
    MultipartError,

    // Server errors (1500-1599)
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Upstream errors (6000-6999)
    /// An upstream dependency could not be reached or timed out
    UpstreamUnavailable,

    /// An upstream dependency answered with an error or malformed data
    UpstreamBadResponse,

    /// Request vector does not match the configured index
    InvalidVector,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::UnsupportedMedia => "UNSUPPORTED_MEDIA",
            Self::MultipartError => "MULTIPART_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamBadResponse => "UPSTREAM_BAD_RESPONSE",
            Self::InvalidVector => "INVALID_VECTOR",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidJson => 1002,
            Self::NotFound => 1004,
            Self::BadRequest => 1006,
            Self::MethodNotAllowed => 1007,
            Self::UnsupportedMedia => 1012,
            Self::MultipartError => 1013,

            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,

            Self::UpstreamUnavailable => 6001,
            Self::UpstreamBadResponse => 6002,
            Self::InvalidVector => 6003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidJson => "Invalid JSON format",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Malformed request",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::UnsupportedMedia => "Unsupported or empty media payload",
            Self::MultipartError => "Failed to read multipart form",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::UpstreamUnavailable => "Upstream service is unavailable",
            Self::UpstreamBadResponse => "Upstream service returned an invalid response",
            Self::InvalidVector => "Feature vector does not match the similarity index",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
