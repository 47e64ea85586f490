//! HTTP server for the attendance and pay engine.
//!
//! Reads configuration from the directory named by `ATTENDANCE_CONFIG_DIR`
//! (default `./config/default`) and serves the API on the configured address.

use std::error::Error;
use std::sync::Arc;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::clock::SystemClock;
use attendance_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_DIR_ENV: &str = "ATTENDANCE_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config_dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let loader = ConfigLoader::load(&config_dir)?;
    let config = loader.config().clone();
    let bind_address = config.service().bind_address.clone();

    info!(
        config_dir = %config_dir,
        default_hourly_wage = config.service().default_hourly_wage,
        lock_timeout_ms = config.service().lock_timeout_ms,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config, Arc::new(SystemClock)));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Attendance server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
