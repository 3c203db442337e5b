//! CLI command definitions and dispatch.

pub mod job;
pub mod migrate;
pub mod serve;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use printq_core::config::{AppConfig, QueueConfig};
use printq_core::error::AppError;
use printq_database::{DatabasePool, PgJobStore};
use printq_service::{HistoryService, QueueEngine};

/// PrintQ: multi-tenant print job queue
#[derive(Debug, Parser)]
#[command(name = "printq", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/default + config/$PRINTQ_ENV)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Consumer account management
    User(user::UserArgs),
    /// Queue inspection and manual enqueue
    Job(job::JobArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.config.as_deref();
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Job(args) => job::execute(args, config, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the layered defaults
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("PRINTQ_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: connect to the configured database
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: queue engine and history service over Postgres
pub fn build_services(
    pool: &DatabasePool,
    queue: QueueConfig,
) -> (Arc<QueueEngine>, HistoryService) {
    let store = Arc::new(PgJobStore::new(pool.pool().clone()));
    let engine = Arc::new(QueueEngine::new(store, queue));
    let history = HistoryService::new(Arc::clone(&engine));
    (engine, history)
}
