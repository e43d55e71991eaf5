use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sppd_api::config;
use sppd_api::database::DatabaseManager;
use sppd_api::routes;
use sppd_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = config::config();
    tracing::info!("Starting SPPD API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if sppd_api::is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT_SECRET is not set; logins will fail until it is configured");
    }

    // Lazy pool: the server starts even when postgres is down and /health reports it
    let pool = DatabaseManager::connect_lazy(&config.database).context("failed to create database pool")?;
    let app = routes::app(AppState::new(pool, config));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("SPPD API listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;
    Ok(())
}
