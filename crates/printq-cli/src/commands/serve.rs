//! Start the PrintQ server.

use std::sync::Arc;

use clap::Args;

use printq_core::error::AppError;
use printq_database::{
    JobStore, MemoryJobStore, MemoryUserStore, PgJobStore, PgUserStore, UserStore,
};

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip running database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,

    /// Keep everything in process memory (development only; data is lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: Option<&str>) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting PrintQ server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    if args.in_memory {
        if config.is_production() {
            return Err(AppError::configuration(
                "--in-memory is not allowed in production",
            ));
        }
        println!("  Store: in-memory");
        let jobs: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        return printq_api::run_server(config, jobs, users).await;
    }

    let pool = super::create_db_pool(&config).await?;

    if !args.no_migrate {
        println!("Running database migrations...");
        printq_database::migration::run_migrations(pool.pool()).await?;
        println!("  Migrations applied successfully.");
    }

    let jobs: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool.pool().clone()));
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.pool().clone()));
    let result = printq_api::run_server(config, jobs, users).await;
    pool.close().await;
    result
}
