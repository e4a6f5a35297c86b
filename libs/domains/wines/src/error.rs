use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WineError {
    /// Payload rejected before any numeric work; names every offending field.
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("{0}")]
    MalformedBody(String),

    #[error("Feature vector has {actual} dimensions, index expects {expected}")]
    InvalidVector { expected: usize, actual: usize },

    #[error("Invalid similarity query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type WineResult<T> = Result<T, WineError>;

impl WineError {
    pub fn validation(fields: Vec<String>, message: impl Into<String>) -> Self {
        WineError::Validation {
            message: message.into(),
            fields,
        }
    }

    /// Only transient upstream failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WineError::Upstream(e) if e.is_transient())
    }

    /// Short label for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            WineError::Validation { .. } | WineError::MalformedBody(_) => "invalid",
            WineError::InvalidVector { .. } | WineError::InvalidQuery(_) => "invalid_vector",
            WineError::Upstream(_) => "upstream_error",
        }
    }
}

/// Convert WineError to AppError for standardized HTTP error responses
impl From<WineError> for AppError {
    fn from(err: WineError) -> Self {
        match err {
            WineError::Validation { message, fields } => AppError::Validation { message, fields },
            WineError::MalformedBody(msg) => AppError::InvalidJson(msg),
            e @ WineError::InvalidVector { .. } => AppError::InvalidVector(e.to_string()),
            WineError::InvalidQuery(msg) => AppError::InternalServerError(msg),
            WineError::Upstream(e) if e.is_unavailable() => {
                AppError::ServiceUnavailable(e.to_string())
            }
            WineError::Upstream(e) => AppError::BadGateway(e.to_string()),
        }
    }
}

impl IntoResponse for WineError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
