//! Upstream call plumbing shared by the domain clients.
//!
//! - [`UpstreamError`]: the one error type every external call fails with
//! - [`retry`]: bounded exponential backoff behind a caller-chosen retry predicate
//! - [`auth`]: bearer token sources (static token or GCP metadata server)
//! - [`client`]: `UpstreamConfig` and the shared `reqwest::Client` builder

pub mod auth;
pub mod client;
pub mod error;
pub mod retry;

pub use auth::{MetadataServerToken, StaticToken, TokenProvider, token_provider_from_config};
pub use client::{UpstreamConfig, build_http_client};
pub use error::{MAX_ERROR_BODY, UpstreamError, UpstreamResult};
pub use retry::{RetryConfig, retry_with_backoff};
