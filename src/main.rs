use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use afe_bridge_api::app::{self, AppState};
use afe_bridge_api::auth::ApiKey;
use afe_bridge_api::config;
use afe_bridge_api::database::{DatabaseManager, SqlServerRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up SQL_* and API_KEY
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().context("invalid configuration")?;
    tracing::info!("Starting AFE bridge API in {:?} mode", config.environment);

    let Some(api_key) = ApiKey::new(&config.security.api_key) else {
        bail!("API_KEY must be set to a non-empty value");
    };

    let manager = DatabaseManager::connect_lazy(&config.database)?;
    let repository = SqlServerRepository::new(
        manager,
        config.database.enable_query_logging,
        config.database.slow_query_threshold_ms,
    );

    let state = AppState::new(Arc::new(repository), api_key, &config.api);
    let app = app::router(state, &config.api, &config.security);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("AFE bridge API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
