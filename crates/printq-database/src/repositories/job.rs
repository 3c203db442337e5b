//! Postgres job store.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use printq_core::result::AppResult;
use printq_core::types::{JobId, UnitId};
use printq_entity::job::Job;

use crate::error::{map_commit_error, map_sqlx_error};
use crate::store::JobStore;

/// Job store backed by the `print_jobs` table.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    /// Create a new job store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, unit_id: UnitId, payload: Value) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO print_jobs (unit_id, job_data, status) \
             VALUES ($1, $2, 'pending') RETURNING *",
        )
        .bind(unit_id)
        .bind(&payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert job", e))
    }

    async fn claim_one_eligible(&self, unit_id: UnitId) -> AppResult<Option<Job>> {
        // Dropping `tx` without commit rolls back and releases the row lock.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin claim transaction", e))?;

        let candidate: Option<JobId> = sqlx::query_scalar(
            "SELECT id FROM print_jobs \
             WHERE unit_id = $1 AND status = 'pending' \
             ORDER BY created_at ASC, id ASC \
             FOR UPDATE SKIP LOCKED \
             LIMIT 1",
        )
        .bind(unit_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to select pending job", e))?;

        let Some(job_id) = candidate else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("Failed to end claim transaction", e))?;
            return Ok(None);
        };

        let job = sqlx::query_as::<_, Job>(
            "UPDATE print_jobs SET status = 'processing' \
             WHERE id = $1 RETURNING *",
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to mark job processing", e))?;

        tx.commit()
            .await
            .map_err(|e| map_commit_error("Failed to commit claim", e))?;

        debug!(unit_id = %unit_id, job_id = %job.id, "Claimed job row");
        Ok(Some(job))
    }

    async fn complete_if_processing(&self, unit_id: UnitId, job_id: JobId) -> AppResult<bool> {
        // Autocommit: a dropped connection here may follow a committed update.
        let result = sqlx::query(
            "UPDATE print_jobs SET status = 'completed', completed_at = NOW() \
             WHERE id = $1 AND unit_id = $2 AND status = 'processing'",
        )
        .bind(job_id)
        .bind(unit_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_commit_error("Failed to complete job", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_history(&self, unit_id: UnitId, limit: i64) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            "SELECT * FROM print_jobs WHERE unit_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(unit_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list job history", e))
    }

    async fn fetch_payload(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT job_data FROM print_jobs WHERE id = $1 AND unit_id = $2",
        )
        .bind(job_id)
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to fetch job payload", e))
    }

    async fn find(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM print_jobs WHERE id = $1 AND unit_id = $2")
            .bind(job_id)
            .bind(unit_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find job", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| map_sqlx_error("Health check failed", e))
    }
}
