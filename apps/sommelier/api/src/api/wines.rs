use axum::Router;
use domain_wines::{VertexIndexClient, WineService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let config = &state.config;
    let index = VertexIndexClient::new(state.http.clone(), config.index.clone(), state.tokens.clone());
    let legacy_index = VertexIndexClient::new(
        state.http.clone(),
        config.legacy_index.clone(),
        state.tokens.clone(),
    );

    let service = WineService::new(index, legacy_index)
        .with_top_k(config.neighbor_count)
        .with_retry(config.upstream.retry_config());
    handlers::router(service)
}
