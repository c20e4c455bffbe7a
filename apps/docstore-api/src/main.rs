use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use docstore::mongodb::MongoConnection;
use std::time::Duration;
use tracing::{error, info, warn};

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

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let connection = match &config.mongodb {
        Some(mongodb) => {
            info!(
                url = %mongodb.redacted_url(),
                database = %mongodb.database(),
                "Connecting to MongoDB"
            );
            Some(MongoConnection::connect_from_config(mongodb).await?)
        }
        None => {
            warn!("MONGODB_URL not set, starting without MongoDB");
            None
        }
    };

    let disconnect_timeout = config
        .mongodb
        .as_ref()
        .map(|mongodb| mongodb.disconnect_timeout())
        .unwrap_or_default();

    let state = AppState::new(
        config,
        connection.as_ref().map(|conn| conn.database().clone()),
    );
    let app = api::app(&state);

    info!("Starting Docstore API with production-ready shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(conn) = connection {
                info!("Shutting down: closing MongoDB connection");
                if let Err(e) = conn.close(disconnect_timeout).await {
                    error!("Error closing MongoDB connection: {}", e);
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Docstore API shutdown complete");
    Ok(())
}
