mod config;
mod data;
mod http;
mod monitoring;
mod views;

use std::sync::Arc;

use anyhow::Result;
use config::{Config, EnvConfig};
use data::opensky::OpenSkyClient;
use http::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let env_config = EnvConfig::load()?;
    let config = Config::load(env_config.config_path())?.apply_env(&env_config);

    // Initialize tracing
    monitoring::logger::init(&config.logging);

    tracing::info!("✈️  Flight insights starting...");

    let client = OpenSkyClient::new(&config.upstream, env_config.credentials.clone());
    tracing::info!("Upstream states endpoint: {}", client.states_url());
    if env_config.credentials.is_some() {
        tracing::info!("Using authenticated upstream access");
    }

    let state = AppState::new(Arc::new(client));
    let app = create_router(state, &config.server)?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving; the process can still be stopped externally
        std::future::pending::<()>().await;
    }
}
