//! PrintQ Server: multi-tenant print job queue
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use printq_core::config::AppConfig;
use printq_core::error::AppError;
use printq_database::{DatabasePool, JobStore, PgJobStore, PgUserStore, UserStore};

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

/// Load configuration from `config/` and `PRINTQ__*` environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("PRINTQ_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("PRINTQ_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.environment,
        "Starting PrintQ v{}",
        env!("CARGO_PKG_VERSION")
    );

    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    printq_database::migration::run_migrations(db_pool.pool()).await?;
    tracing::info!("Database migrations complete");

    let jobs: Arc<dyn JobStore> = Arc::new(PgJobStore::new(db_pool.pool().clone()));
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db_pool.pool().clone()));

    let result = printq_api::run_server(config, jobs, users).await;

    db_pool.close().await;
    tracing::info!("PrintQ server shut down");
    result
}
