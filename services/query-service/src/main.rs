use anyhow::{anyhow, Result};
use common::config::AppConfig;
use common::telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

mod handlers;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    init_telemetry(TelemetryConfig::for_service("query-service", &config))
        .map_err(|e| anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Starting Query Service...");
    tracing::info!("Distributed tracing: {}", if config.enable_jaeger { "enabled" } else { "disabled" });
    tracing::info!("Configuration:");
    tracing::info!("  Cache backend: {:?}", config.cache.backend);
    tracing::info!("  Database max connections: {}", config.database.max_connections);
    tracing::info!("  Port: {}", config.port);

    let shutdown = CancellationToken::new();

    // Initialize application state
    let state = AppState::new(&config, shutdown.clone()).await?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Query service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    // Shutdown telemetry gracefully
    shutdown_telemetry();

    Ok(())
}

/// Resolves on Ctrl-C after cancelling in-flight lookups
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
