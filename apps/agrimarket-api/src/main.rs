use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::{JwtAuth, set_expose_error_traces};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::{AppState, MongoState};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Stack traces in 5xx bodies only outside production
    set_expose_error_traces(!config.environment.is_production());

    let mongo = match &config.mongodb {
        Some(mongo_config) => {
            info!(database = %mongo_config.database, "Connecting to MongoDB");

            let client =
                database::mongodb::connect_from_config_with_retry(mongo_config, None).await?;
            let db = client.database(&mongo_config.database);

            api::init_indexes(&db).await?;
            info!(database = %mongo_config.database, "MongoDB ready");

            Some(MongoState { client, db })
        }
        None => {
            info!("Using in-memory storage; listings are lost on restart");
            None
        }
    };

    let state = AppState {
        jwt: JwtAuth::new(&config.jwt),
        config,
        mongo,
    };

    let api_routes = api::routes(&state);

    // Docs UIs, /api nesting, CORS, security headers, tracing, compression
    let router = create_router::<openapi::ApiDoc>(api_routes, state.config.environment).await?;

    let app = router.merge(health_router(state.config.app));

    info!(
        name = state.config.app.name,
        version = state.config.app.version,
        storage = %state.config.storage,
        "Starting server with graceful shutdown (30s timeout)"
    );

    let mongo_client = state.mongo.map(|mongo| mongo.client);

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(client) = mongo_client {
                info!("Shutting down: closing MongoDB connections");
                client.shutdown().await;
                info!("MongoDB connection closed successfully");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("AgriMarket API shutdown complete");
    Ok(())
}
