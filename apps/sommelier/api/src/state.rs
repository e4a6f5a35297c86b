//! Application state management.
//!
//! One `reqwest::Client` and one token source are shared by every external
//! client the routers build.

use core_upstream::{TokenProvider, build_http_client, token_provider_from_config};
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// Pooled HTTP client with the upstream timeout applied
    pub http: reqwest::Client,
    /// Bearer tokens for the Google APIs
    pub tokens: Arc<dyn TokenProvider>,
}

impl AppState {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let http = build_http_client(&config.upstream)
            .map_err(|e| eyre::eyre!("Failed to build HTTP client: {}", e))?;
        let tokens = token_provider_from_config(&config.upstream, http.clone());

        Ok(Self {
            config,
            http,
            tokens,
        })
    }
}
