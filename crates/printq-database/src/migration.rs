//! Embedded schema migrations for the `users` and `print_jobs` tables.

use std::collections::HashSet;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use printq_core::error::{AppError, ErrorKind};

use crate::error::map_sqlx_error;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// One embedded migration and whether the database has applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Version prefix of the migration file.
    pub version: i64,
    /// Description derived from the file name.
    pub description: String,
    /// Recorded as successfully applied.
    pub applied: bool,
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(embedded = MIGRATOR.iter().count(), "Running database migrations...");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Compare the embedded migrations with what the database has recorded.
///
/// Read-only: a database that was never migrated reports everything as
/// pending instead of creating the bookkeeping table.
pub async fn migration_status(pool: &PgPool) -> Result<Vec<MigrationStatus>, AppError> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to inspect migrations table", e))?;

    let applied: HashSet<i64> = if tracked {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to read applied migrations", e))?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    Ok(embedded_status(&applied))
}

fn embedded_status(applied: &HashSet<i64>) -> Vec<MigrationStatus> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_create_users_before_jobs() {
        let status = embedded_status(&HashSet::new());
        let descriptions: Vec<&str> = status.iter().map(|m| m.description.as_str()).collect();

        assert_eq!(descriptions, vec!["create users", "create print jobs"]);
        assert!(status.windows(2).all(|w| w[0].version < w[1].version));
        assert!(status.iter().all(|m| !m.applied));
    }

    #[test]
    fn test_applied_versions_are_marked() {
        let first = embedded_status(&HashSet::new())[0].version;
        let status = embedded_status(&HashSet::from([first]));
        assert!(status[0].applied);
        assert!(!status[1].applied);
    }
}
