use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// Form accepted but it carries no usable `image` file.
    #[error("{0}")]
    MissingImage(String),

    /// Empty payload or bytes that are not a recognised image format.
    #[error("{0}")]
    UnsupportedMedia(String),

    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type OcrResult<T> = Result<T, OcrError>;

impl OcrError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, OcrError::Upstream(e) if e.is_transient())
    }

    /// Short label for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            OcrError::MissingImage(_)
            | OcrError::MultipartRejection(_)
            | OcrError::Multipart(_) => "bad_request",
            OcrError::UnsupportedMedia(_) => "unsupported_media",
            OcrError::Upstream(_) => "upstream_error",
        }
    }
}

/// Every OCR upstream failure is a bad gateway, including timeouts.
impl From<OcrError> for AppError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::MissingImage(msg) => AppError::BadRequest(msg),
            OcrError::UnsupportedMedia(msg) => AppError::UnsupportedMedia(msg),
            OcrError::MultipartRejection(e) => AppError::MultipartRejection(e),
            OcrError::Multipart(e) => AppError::Multipart(e),
            OcrError::Upstream(e) => AppError::BadGateway(e.to_string()),
        }
    }
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn upstream_is_always_bad_gateway() {
        for err in [
            UpstreamError::Timeout { service: "vision" },
            UpstreamError::Unavailable {
                service: "vision",
                message: "refused".into(),
            },
            UpstreamError::malformed("vision", "Bad image data"),
        ] {
            assert_eq!(
                AppError::from(OcrError::Upstream(err)).status(),
                StatusCode::BAD_GATEWAY
            );
        }
    }

    #[test]
    fn client_errors_are_bad_request() {
        assert_eq!(
            AppError::from(OcrError::MissingImage("No image file provided".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(OcrError::UnsupportedMedia("Image payload is empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn only_transient_upstream_errors_retry() {
        assert!(OcrError::Upstream(UpstreamError::Timeout { service: "vision" }).is_retryable());
        assert!(!OcrError::Upstream(UpstreamError::malformed("vision", "x")).is_retryable());
        assert!(!OcrError::UnsupportedMedia("x".into()).is_retryable());
    }
}
