use anyhow::Context;
use catalogo_api::{
    app::{self, AppState},
    config::AppConfig,
    database::{ensure_schema, DatabaseManager},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting catalogo-api in {:?} mode", config.environment);
    tracing::debug!("Configuration: {}", serde_json::to_string(&config)?);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    ensure_schema(&pool).await.context("failed to create the schema")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, pool);
    state
        .images
        .ensure_dir()
        .await
        .with_context(|| format!("failed to create upload directory {}", state.images.dir().display()))?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("catalogo-api listening on http://{}", bind_addr);

    axum::serve(listener, app::router(state))
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
