//! Cloud Vision `images:annotate` client.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use core_config::{ConfigError, FromEnv, env_or_default};
use core_upstream::{TokenProvider, UpstreamError, UpstreamResult};
use observability::UpstreamMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::detector::{SERVICE, TextDetector};

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

#[derive(Debug, Clone, PartialEq)]
pub struct VisionConfig {
    pub endpoint: String,
}

impl VisionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint.trim_end_matches('/'))
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_VISION_ENDPOINT)
    }
}

impl FromEnv for VisionConfig {
    /// Reads VISION_ENDPOINT (default `https://vision.googleapis.com`).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_or_default("VISION_ENDPOINT", DEFAULT_VISION_ENDPOINT)))
    }
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

/// [`TextDetector`] backed by Cloud Vision `TEXT_DETECTION`.
pub struct VisionClient {
    client: reqwest::Client,
    config: VisionConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl VisionClient {
    pub fn new(client: reqwest::Client, config: VisionConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            config,
            tokens,
        }
    }

    async fn annotate(&self, image: &[u8]) -> UpstreamResult<String> {
        let token = self.tokens.access_token().await?;

        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: [Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let response = self
            .client
            .post(self.config.annotate_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::status(SERVICE, status.as_u16(), &text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;
        let parsed: AnnotateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;

        let Some(first) = parsed.responses.into_iter().next() else {
            return Ok(String::new());
        };

        if let Some(error) = first.error.filter(|e| !e.message.is_empty()) {
            return Err(UpstreamError::malformed(
                SERVICE,
                format!("Vision API error: {}", error.message),
            ));
        }

        Ok(first
            .text_annotations
            .into_iter()
            .next()
            .map(|a| a.description)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TextDetector for VisionClient {
    async fn detect_text(&self, image: &[u8]) -> UpstreamResult<String> {
        let started = Instant::now();
        let outcome = self.annotate(image).await;

        match &outcome {
            Ok(text) => {
                UpstreamMetrics::record_call(SERVICE, "success", started.elapsed());
                tracing::debug!(
                    component = SERVICE,
                    image_size = image.len(),
                    text_length = text.len(),
                    "text detection succeeded"
                );
            }
            Err(e) => {
                UpstreamMetrics::record_call(SERVICE, e.kind(), started.elapsed());
                tracing::warn!(
                    component = SERVICE,
                    image_size = image.len(),
                    error = %e,
                    "text detection failed"
                );
            }
        }

        outcome
    }
}
