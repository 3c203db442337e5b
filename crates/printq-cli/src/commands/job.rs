//! Queue inspection and manual enqueue commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use printq_core::error::AppError;
use printq_core::types::{JobId, UnitId};
use printq_entity::job::{Job, REPRINT_OF_KEY};

/// Arguments for job commands
#[derive(Debug, Args)]
pub struct JobArgs {
    /// Job subcommand
    #[command(subcommand)]
    pub command: JobCommand,
}

/// Job subcommands
#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// Add a pending job for a unit
    Enqueue {
        /// Target unit
        #[arg(short, long)]
        unit: i64,
        /// Job payload as a JSON object
        #[arg(short, long)]
        data: String,
    },
    /// Show a unit's most recent jobs
    History {
        /// Unit to list
        #[arg(short, long)]
        unit: i64,
        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// Show a single job including its payload
    Show {
        /// Owning unit
        #[arg(short, long)]
        unit: i64,
        /// Job ID
        id: i64,
    },
    /// Enqueue a fresh copy of an existing job
    Reprint {
        /// Owning unit
        #[arg(short, long)]
        unit: i64,
        /// Job ID to copy
        id: i64,
    },
}

/// Job display row for table output
#[derive(Debug, Serialize, Tabled)]
struct JobRow {
    /// Job ID
    id: i64,
    /// Status
    status: String,
    /// Created at
    created_at: String,
    /// Completed at
    completed_at: String,
    /// Source job when this is a reprint
    reprint_of: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.get(),
            status: job.status.to_string(),
            created_at: job.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            completed_at: job
                .completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            reprint_of: job
                .payload
                .get(REPRINT_OF_KEY)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute job commands
pub async fn execute(
    args: &JobArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let (engine, history) = super::build_services(&pool, config.queue.clone());

    let result = async {
        match &args.command {
            JobCommand::Enqueue { unit, data } => {
                let payload: Value = serde_json::from_str(data)
                    .map_err(|e| AppError::validation(format!("Invalid JSON payload: {e}")))?;
                let job = engine.enqueue(UnitId::from(*unit), payload).await?;
                output::print_success("Job enqueued");
                output::print_kv("Job ID", &job.id.to_string());
                output::print_kv("Unit", &job.unit_id.to_string());
            }
            JobCommand::History { unit, limit } => {
                let jobs = history.get_history(UnitId::from(*unit), *limit).await?;
                let rows: Vec<JobRow> = jobs.iter().map(JobRow::from).collect();
                output::print_list(&rows, format);
            }
            JobCommand::Show { unit, id } => {
                let job = engine.find(UnitId::from(*unit), JobId::from(*id)).await?;
                output::print_item(&job, format);
            }
            JobCommand::Reprint { unit, id } => {
                let job = history.reprint(UnitId::from(*unit), JobId::from(*id)).await?;
                output::print_success("Reprint enqueued");
                output::print_kv("Job ID", &job.id.to_string());
                output::print_kv("Copy of", &id.to_string());
            }
        }
        Ok::<(), AppError>(())
    }
    .await;

    pool.close().await;
    result
}
