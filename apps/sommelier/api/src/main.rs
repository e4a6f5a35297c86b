use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    info!(
        comprehensive_index = %config.index.deployed_index_id,
        legacy_index = %config.legacy_index.deployed_index_id,
        distance_measure = config.index.distance_measure.as_str(),
        neighbor_count = config.neighbor_count,
        "Configuration loaded"
    );

    let server_config = config.server.clone();
    let state = AppState::new(config)?;

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &server_config)?;

    // /health: liveness check with app name/version
    let app = router.merge(health_router(state.config.app));

    info!("Starting wine recommender with production-ready shutdown (30s timeout)");

    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            // reqwest pools close on drop
            drop(state);
            info!("Upstream clients released");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Wine recommender shutdown complete");
    Ok(())
}
