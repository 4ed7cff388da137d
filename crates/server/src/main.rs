use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use verto_core::{LanguageTable, ModelClient};

mod app;
mod config;
mod error;
mod routes;

use app::{AppState, build_app};
use config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,verto_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    let client = config.verto.ollama_client().context("Failed to build model client")?;

    match client.is_model_available(&config.verto.model).await {
        Ok(true) => tracing::info!(model = %config.verto.model, "Model is available"),
        Ok(false) => tracing::warn!(
            model = %config.verto.model,
            "Model is not available. Please ensure Ollama is running and the model is loaded."
        ),
        Err(e) => tracing::warn!(url = %client.base_url(), error = %e, "Could not reach Ollama"),
    }

    let state = AppState::new(client, LanguageTable::builtin().shared(), config.verto.clone());
    let app = build_app(state, config.request_timeout);

    let listener = TcpListener::bind(config.addr).await.context("Failed to bind to address")?;
    tracing::info!("Listening on http://{}", config.addr);
    tracing::info!("Health check: http://{}/health", config.addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
