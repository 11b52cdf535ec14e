// CampusConnect API server
// Decision: Store selection runs once at startup and is never retried

use std::sync::Arc;

use anyhow::{Context, Result};
use campusconnect_api::{build_router, ApiConfig};
use campusconnect_storage::StoreSelector;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("campusconnect_api=debug,campusconnect_storage=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("campusconnect-api starting...");

    let config = ApiConfig::from_env();
    let selector = Arc::new(StoreSelector::initialize(&config.store).await);
    tracing::info!(database = %selector.connection_status(), "Store selected");

    let app = build_router(selector.clone(), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    selector.shutdown().await;
    tracing::info!("campusconnect-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
