use anyhow::Context;
use db::DBService;
use server::{AppState, config::ServerConfig, create_router};
use services::services::generation_api::{API_KEY_ENV, GenerationSettings};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    utils::logging::init("info")?;

    let config = ServerConfig::from_env()?;
    let generation = GenerationSettings::from_env();
    if generation.api_key.is_none() {
        warn!("{API_KEY_ENV} is not set; generation endpoints will fail until it is configured");
    }

    let db = DBService::new(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;

    let model = generation.model.clone();
    let app = create_router(AppState::new(db, generation));
    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, %model, "course studio server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
