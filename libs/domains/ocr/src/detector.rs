use async_trait::async_trait;
use core_upstream::UpstreamResult;

/// Service label used in errors and metrics.
pub const SERVICE: &str = "vision";

/// Text recognition capability.
///
/// One call per invocation, no retries. An image without any readable text
/// yields an empty string, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(&self, image: &[u8]) -> UpstreamResult<String>;
}
