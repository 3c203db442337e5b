//! Consumer account CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use printq_auth::JwtEncoder;
use printq_core::error::{AppError, ErrorKind};
use printq_core::types::UnitId;
use printq_database::PgUserStore;
use printq_service::AuthService;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a consumer account bound to a unit
    Create {
        /// Login name
        username: String,
        /// Unit whose jobs this account may claim
        #[arg(short, long)]
        unit: i64,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: i64,
    /// Username
    username: String,
    /// Unit
    unit_id: i64,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let auth = AuthService::new(
        Arc::new(PgUserStore::new(pool.pool().clone())),
        JwtEncoder::new(&config.auth),
    );

    match &args.command {
        UserCommand::Create {
            username,
            unit,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt(format!("Password for '{username}'"))
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let user = match auth.create_user(username, &password, UnitId::from(*unit)).await {
                Ok(user) => user,
                Err(e) if e.kind == ErrorKind::Conflict => {
                    return Err(AppError::conflict(format!(
                        "User '{username}' already exists"
                    )));
                }
                Err(e) => return Err(e),
            };

            output::print_list(
                &[UserRow {
                    id: user.id.get(),
                    username: user.username.clone(),
                    unit_id: user.unit_id.get(),
                    created_at: user.created_at.format("%Y-%m-%d %H:%M").to_string(),
                }],
                format,
            );
            output::print_success(&format!("User '{}' created", user.username));
        }
    }

    pool.close().await;
    Ok(())
}
