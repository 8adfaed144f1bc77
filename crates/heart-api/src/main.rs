//! Heart disease prediction service
//!
//! Loads the fitted scaler and classifiers once at startup and serves
//! predictions over HTTP.

use anyhow::Result;
use heart_api::{api, config::ServerConfig, startup};
use predictor_lib::StructuredLogger;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_NAME: &str = "heart-api";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServerConfig::load()?;
    let model_dir = config.resolved_model_dir();
    let addr = config.bind_addr();
    info!(addr = %addr, model_dir = %model_dir.display(), "Service configured");

    let logger = StructuredLogger::new(SERVICE_NAME);
    let state = startup::build_state(
        &model_dir,
        Duration::from_millis(config.slow_inference_ms),
        logger.clone(),
    )
    .await;

    logger.log_startup(SERVICE_VERSION, &addr, &model_dir);

    api::serve(&addr, Arc::new(state), shutdown_signal()).await?;

    logger.log_shutdown("SIGINT received");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
