//! Keystone Server — backend service scaffold.
//!
//! Main entry point: loads configuration, initializes logging, waits for
//! the database, and starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use keystone_core::config::AppConfig;
use keystone_core::error::AppError;
use keystone_database::connection::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `KEYSTONE_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("KEYSTONE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Keystone v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect_with_retry(&config.database).await?;

    keystone_http::app::run_server(config, db).await
}
