use thiserror::Error;

/// Failure of a single call to an external service.
///
/// `service` is a short static label ("similarity_index", "vision") used in
/// messages and metrics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{service} is unreachable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} returned status {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    #[error("Failed to obtain access token: {0}")]
    Auth(String),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Longest upstream error body, in characters, kept in an error message.
pub const MAX_ERROR_BODY: usize = 256;

impl UpstreamError {
    /// Non-success HTTP answer; the body is cut to [`MAX_ERROR_BODY`] characters.
    pub fn status(service: &'static str, status: u16, body: &str) -> Self {
        Self::Status {
            service,
            status,
            message: truncate_body(body, MAX_ERROR_BODY),
        }
    }

    pub fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            message: message.into(),
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { service }
        } else if err.is_decode() {
            Self::Malformed {
                service,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                service,
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Unavailable {
                service,
                message: err.to_string(),
            }
        }
    }

    /// Whether a retry has a chance of succeeding.
    ///
    /// Connection failures, timeouts, 429 and 5xx are transient; malformed
    /// bodies, auth failures and other 4xx are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed { .. } | Self::Auth(_) => false,
        }
    }

    /// The service could not be reached at all (as opposed to answering badly).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::Malformed { .. } => "malformed",
            Self::Auth(_) => "auth",
        }
    }
}

fn truncate_body(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
