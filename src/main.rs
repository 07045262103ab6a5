use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use pagesmith::{Config, PagesmithService, handlers};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    if !config.has_api_key() {
        tracing::warn!("No Gemini API key configured; generation requests will fail");
    }

    let service = PagesmithService::new(&config)?;

    let bind: SocketAddr = config.server.bind.parse().with_context(|| {
        format!(
            "Invalid bind address '{}' (expected host:port)",
            config.server.bind
        )
    })?;
    let bearer_token = config.server.bearer_token.clone();
    let auth = if bearer_token.is_some() { "bearer" } else { "none" };

    let router = handlers::router(service, bearer_token);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        model = %config.gemini.model,
        auth,
        max_upload_bytes = config.upload.max_bytes,
        "Starting pagesmith UI"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
