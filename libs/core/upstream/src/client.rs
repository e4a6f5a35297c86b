use core_config::{ConfigError, FromEnv, env_optional, env_parse};
use std::time::Duration;

use crate::retry::RetryConfig;

pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Settings shared by every external client.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Total time budget for one call
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Retries the orchestrators may spend on transient failures
    pub max_retries: u32,
    /// Bearer token for local development; the metadata server is used otherwise
    pub access_token: Option<String>,
    pub metadata_token_url: String,
}

impl UpstreamConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_metadata_token_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_token_url = url.into();
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new().with_max_retries(self.max_retries)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
            max_retries: 2,
            access_token: None,
            metadata_token_url: DEFAULT_METADATA_TOKEN_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_retries", &self.max_retries)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("metadata_token_url", &self.metadata_token_url)
            .finish()
    }
}

impl FromEnv for UpstreamConfig {
    /// Reads:
    /// - UPSTREAM_TIMEOUT_SECS (default 10)
    /// - UPSTREAM_MAX_RETRIES (default 2)
    /// - GOOGLE_ACCESS_TOKEN (optional)
    /// - GCE_METADATA_TOKEN_URL (optional override)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_secs: u64 = env_parse("UPSTREAM_TIMEOUT_SECS", defaults.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "UPSTREAM_TIMEOUT_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: defaults.connect_timeout.min(Duration::from_secs(timeout_secs)),
            max_retries: env_parse("UPSTREAM_MAX_RETRIES", defaults.max_retries)?,
            access_token: env_optional("GOOGLE_ACCESS_TOKEN"),
            metadata_token_url: env_optional("GCE_METADATA_TOKEN_URL")
                .unwrap_or(defaults.metadata_token_url),
        })
    }
}

/// Build the `reqwest::Client` shared by the external clients.
///
/// The client enforces the configured timeout on every request, so a slow
/// upstream surfaces as [`crate::UpstreamError::Timeout`].
pub fn build_http_client(config: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(concat!("wine-recommender/", env!("CARGO_PKG_VERSION")))
        .build()
}
