use core_upstream::{RetryConfig, UpstreamError, retry_with_backoff};
use observability::{LabelMetrics, UpstreamMetrics};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::detector::{SERVICE, TextDetector};
use crate::error::OcrResult;
use crate::media;

/// Text read from a label image; empty when none was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedText {
    #[schema(example = "CHATEAU MARGAUX\nPremier Grand Cru Classé\n2015")]
    pub text: String,
}

pub struct OcrService<D: TextDetector> {
    detector: Arc<D>,
    retry: RetryConfig,
}

impl<D: TextDetector> OcrService<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector: Arc::new(detector),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Read the text printed on a label image.
    pub async fn extract(&self, image: &[u8]) -> OcrResult<ExtractedText> {
        let outcome = self.run(image).await;

        match &outcome {
            Ok(extracted) => {
                tracing::info!(
                    component = "label_reader",
                    image_size = image.len(),
                    text_length = extracted.text.len(),
                    "label text extracted"
                );
                LabelMetrics::record_extraction("success", image.len());
            }
            Err(e) => {
                tracing::warn!(
                    component = "label_reader",
                    image_size = image.len(),
                    error = %e,
                    "label text extraction failed"
                );
                LabelMetrics::record_extraction(e.outcome(), image.len());
            }
        }

        outcome
    }

    async fn run(&self, image: &[u8]) -> OcrResult<ExtractedText> {
        let format = media::sniff(image)?;
        tracing::debug!(component = "label_reader", format = ?format, "image accepted");

        let detector = &self.detector;
        let text = retry_with_backoff(
            || detector.detect_text(image),
            self.retry.clone(),
            |e: &UpstreamError| {
                let retry = e.is_transient();
                if retry {
                    UpstreamMetrics::record_retry(SERVICE);
                }
                retry
            },
        )
        .await?;

        Ok(ExtractedText { text })
    }
}
