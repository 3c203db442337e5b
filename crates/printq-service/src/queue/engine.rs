//! Queue engine: enqueue, claim, and complete.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use printq_core::config::QueueConfig;
use printq_core::error::AppError;
use printq_core::result::AppResult;
use printq_core::types::{JobId, UnitId};
use printq_database::JobStore;
use printq_entity::job::{Job, validate_payload};

use super::policy::RetryPolicy;

/// Drives jobs through `pending -> processing -> completed`.
///
/// All mutual exclusion between callers lives in the store's atomic
/// primitives; the engine never reads a status and then writes it.
#[derive(Clone)]
pub struct QueueEngine {
    /// Backing job store.
    store: Arc<dyn JobStore>,
    /// Retry and deadline rules.
    policy: RetryPolicy,
}

impl std::fmt::Debug for QueueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl QueueEngine {
    /// Creates a new queue engine.
    pub fn new(store: Arc<dyn JobStore>, config: QueueConfig) -> Self {
        Self {
            store,
            policy: RetryPolicy::new(config),
        }
    }

    /// Queue configuration in effect.
    pub fn config(&self) -> &QueueConfig {
        self.policy.config()
    }

    /// Add a job to the unit's queue.
    ///
    /// Not retried: an insert whose commit succeeded but whose reply was
    /// lost would otherwise be duplicated.
    pub async fn enqueue(&self, unit_id: UnitId, payload: Value) -> AppResult<Job> {
        validate_payload(&payload)?;

        let job = self
            .policy
            .once("enqueue", self.store.insert(unit_id, payload))
            .await?;

        info!(unit_id = %unit_id, job_id = %job.id, "Job enqueued");
        Ok(job)
    }

    /// Claim the oldest pending job of the unit, if any.
    pub async fn claim_next(&self, unit_id: UnitId) -> AppResult<Option<Job>> {
        let store = &self.store;
        let claimed = self
            .policy
            .retrying("claim_next", move || store.claim_one_eligible(unit_id))
            .await?;

        match &claimed {
            Some(job) => info!(unit_id = %unit_id, job_id = %job.id, "Job claimed"),
            None => debug!(unit_id = %unit_id, "No pending job to claim"),
        }
        Ok(claimed)
    }

    /// Mark a job the unit is processing as completed.
    ///
    /// Unknown ids, other units' jobs, and jobs not in `processing` all fail
    /// with `NotFound`.
    pub async fn complete_job(&self, unit_id: UnitId, job_id: JobId) -> AppResult<()> {
        let store = &self.store;
        let changed = self
            .policy
            .retrying("complete_job", move || {
                store.complete_if_processing(unit_id, job_id)
            })
            .await?;

        if !changed {
            debug!(unit_id = %unit_id, job_id = %job_id, "Completion rejected");
            return Err(AppError::not_found(format!(
                "Job {job_id} not found or not in processing state"
            )));
        }

        info!(unit_id = %unit_id, job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Look up one job of the unit.
    pub async fn find(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Job> {
        let store = &self.store;
        self.policy
            .retrying("find", move || store.find(unit_id, job_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Job {job_id} not found")))
    }

    /// Newest-first jobs of the unit. The limit is trusted as given.
    pub async fn history(&self, unit_id: UnitId, limit: i64) -> AppResult<Vec<Job>> {
        let store = &self.store;
        self.policy
            .retrying("history", move || store.list_history(unit_id, limit))
            .await
    }

    /// Payload of one job of the unit.
    pub async fn payload(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Value>> {
        let store = &self.store;
        self.policy
            .retrying("fetch_payload", move || store.fetch_payload(unit_id, job_id))
            .await
    }

    /// Whether the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.policy
            .once("health_check", self.store.health_check())
            .await
    }
}
