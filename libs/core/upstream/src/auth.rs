//! Bearer token sources for Google Cloud REST APIs.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::client::UpstreamConfig;
use crate::error::{UpstreamError, UpstreamResult};

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Supplies OAuth2 access tokens for outgoing requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> UpstreamResult<String>;
}

/// A fixed token, typically `GOOGLE_ACCESS_TOKEN` during local development.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> UpstreamResult<String> {
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Token from the GCE/GKE metadata server (workload identity), cached until
/// shortly before it expires.
pub struct MetadataServerToken {
    client: reqwest::Client,
    url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataServerToken {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> UpstreamResult<CachedToken> {
        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| {
                UpstreamError::Auth(format!(
                    "metadata server unreachable: {}. \
                     Set GOOGLE_ACCESS_TOKEN for local development.",
                    e
                ))
            })?;

        if !response.status().is_success() {
            return Err(UpstreamError::Auth(format!(
                "metadata server returned status {}",
                response.status().as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Auth(format!("failed to parse token response: {}", e)))?;

        let lifetime = Duration::from_secs(body.expires_in.unwrap_or(300));
        Ok(CachedToken {
            token: body.access_token,
            expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }
}

#[async_trait]
impl TokenProvider for MetadataServerToken {
    async fn access_token(&self) -> UpstreamResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if entry.expires_at > Instant::now() {
                return Ok(entry.token.clone());
            }
        }

        let fresh = self.fetch().await?;
        tracing::debug!(component = "auth", "Refreshed access token from metadata server");
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Pick the token source for this process: the configured static token if
/// present, the metadata server otherwise.
pub fn token_provider_from_config(
    config: &UpstreamConfig,
    client: reqwest::Client,
) -> Arc<dyn TokenProvider> {
    match &config.access_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(MetadataServerToken::new(
            client,
            config.metadata_token_url.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_returned_verbatim() {
        let provider = StaticToken::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
        assert_eq!(format!("{:?}", provider), "StaticToken(<redacted>)");
    }

    #[tokio::test]
    async fn metadata_token_is_fetched_once_and_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token")
            .match_header("Metadata-Flavor", "Google")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"ya29.fresh","expires_in":3599,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let provider =
            MetadataServerToken::new(reqwest::Client::new(), format!("{}/token", server.url()));

        assert_eq!(provider.access_token().await.unwrap(), "ya29.fresh");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.fresh");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn metadata_error_status_is_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/token")
            .with_status(403)
            .create_async()
            .await;

        let provider =
            MetadataServerToken::new(reqwest::Client::new(), format!("{}/token", server.url()));

        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Auth(ref m) if m.contains("403")));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn config_token_takes_precedence() {
        let config = UpstreamConfig::default()
            .with_access_token("local")
            .with_metadata_token_url("http://127.0.0.1:9/never");
        let provider = token_provider_from_config(&config, reqwest::Client::new());
        assert_eq!(provider.access_token().await.unwrap(), "local");
    }
}
