//! crewai-service HTTP server binary.
//!
//! Starts an axum HTTP server that runs crews of agents on request.
//! Configuration is read from the environment, see [`crewai_service::config`].
//! `RUST_LOG` sets the tracing filter (default: `info`). Prompts and answers
//! of non-verbose crews are logged at debug, so `RUST_LOG=crewai_service=debug`
//! shows them too.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run --bin server
//! ```

use anyhow::Context;
use crewai_service::server::{app_router, AppState};
use crewai_service::config::DEFAULT_LOG_FILTER;
use crewai_service::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; crew runs will fail until it is");
    }

    let state = AppState::from_config(&config).context("Failed to create LLM")?;
    let app = app_router(state);
    let bind_addr = config.bind_addr();

    tracing::info!("crewai-service {} starting on {}", crewai_service::VERSION, bind_addr);
    tracing::info!("LLM: {}", config.llm.model);
    tracing::info!("CORS origins: {}", config.cors_origins.join(", "));
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                 - service banner");
    tracing::info!("  GET  /health           - liveness probe");
    tracing::info!("  POST /api/crew/run     - run a crew");
    tracing::info!("  POST /api/agent/simple - run a single agent");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("crewai-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
