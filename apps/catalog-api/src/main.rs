use axum::{Router, middleware, routing::get};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_items::{ItemService, JsonFileItemRepository};
use observability::{init_metrics, metrics_handler, metrics_middleware};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    init_metrics().map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    info!(
        data_path = %config.storage.data_path.display(),
        "Opening item collection"
    );

    let repository = JsonFileItemRepository::new(&config.storage.data_path);
    repository.init().await?;

    let items = ItemService::new(repository);

    // Invalidate cached stats when the document is edited outside the API
    let (watcher_shutdown, watcher_rx) = watch::channel(false);
    let watcher = items.watcher(config.storage.poll_interval).spawn(watcher_rx);

    let state = AppState { config, items };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // Merge health and metrics endpoints
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(Router::new().route("/metrics", get(metrics_handler)))
        .layer(middleware::from_fn(metrics_middleware));

    info!("Starting Catalog API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: stopping stats watcher");
            let _ = watcher_shutdown.send(true);
            if let Err(e) = watcher.await {
                tracing::warn!("Stats watcher did not stop cleanly: {}", e);
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
