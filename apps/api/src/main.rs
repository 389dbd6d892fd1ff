mod config;
mod errors;
mod generation;
mod i18n;
mod language;
mod llm_client;
mod prompts;
mod rate_limiter;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::language::WhatlangDetector;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    let level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            config
                .rust_log
                .as_deref()
                .and_then(|filter| EnvFilter::try_new(filter).ok())
                .unwrap_or_else(|| {
                    EnvFilter::new(format!(
                        "{}={level},tower_http={level}",
                        env!("CARGO_PKG_NAME")
                    ))
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hrify v{}", env!("CARGO_PKG_VERSION"));

    // The HTTP client inside is built on the first /process call.
    let llm = Arc::new(LlmClient::new(config.llm_settings()));
    info!(
        "LLM client configured (model: {}, api key set: {})",
        config.openai_model,
        config.openai_api_key.is_some()
    );
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; /process will fail until it is");
    }

    let port = config.port;
    let state = AppState::new(config, Arc::new(WhatlangDetector::new()), llm);

    // First load is fatal: better to refuse to start than to serve 500s.
    state.prompts.load(true).with_context(|| {
        format!(
            "Failed to load prompts from {}",
            state.prompts.path().display()
        )
    })?;

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
