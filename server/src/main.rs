//! Larder Server - inventory ledger over HTTP.

use std::sync::Arc;

use larder_server::config::Config;
use larder_server::inventory::Inventory;
use larder_server::storage::Persistence;
use larder_server::{build_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "larder_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Larder Server on {}:{}", config.host, config.port);

    // Load the ledger
    let persistence = Persistence::from_config(&config);
    tracing::info!("Loading inventory from {}", persistence.describe());
    let inventory = Inventory::open(persistence).await?;

    let state = AppState {
        inventory: inventory.into_shared(),
        config: Arc::new(config.clone()),
    };

    let app = build_app(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
