//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use printq_core::types::{JobId, UnitId};
use printq_core::{AppError, AppResult};

use super::status::JobStatus;

/// A queued print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique, store-assigned identifier.
    pub id: JobId,
    /// Tenant (print unit) that owns the job.
    pub unit_id: UnitId,
    /// Opaque printable payload, always a JSON object.
    #[sqlx(rename = "job_data")]
    #[serde(rename = "job_data")]
    pub payload: Value,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// When the job was inserted.
    pub created_at: DateTime<Utc>,
    /// Set exactly when the job reaches `completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Move a pending job to `processing`.
    pub fn mark_processing(&mut self) -> AppResult<()> {
        self.transition(JobStatus::Processing)
    }

    /// Move a processing job to `completed`, stamping the completion time.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.transition(JobStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }

    fn transition(&mut self, target: JobStatus) -> AppResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(AppError::conflict(format!(
                "Job {} cannot move from {} to {}",
                self.id, self.status, target
            )));
        }
        self.status = target;
        Ok(())
    }

    /// Whether the job belongs to the given unit.
    pub fn is_owned_by(&self, unit_id: UnitId) -> bool {
        self.unit_id == unit_id
    }
}
