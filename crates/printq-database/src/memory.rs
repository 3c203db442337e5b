//! In-memory stores using a Tokio mutex, for single-process deployments
//! and tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use printq_core::error::AppError;
use printq_core::result::AppResult;
use printq_core::types::{JobId, UnitId, UserId};
use printq_entity::job::{Job, JobStatus};
use printq_entity::user::{CreateUser, User};

use crate::store::{JobStore, UserStore};

/// Internal state for the memory job store.
#[derive(Debug, Default)]
struct JobTable {
    /// Last id handed out.
    last_id: i64,
    /// Rows keyed by id, so iteration order is insertion order.
    rows: BTreeMap<JobId, Job>,
}

/// In-memory job store.
///
/// The lock is held across select and update, so a claim is atomic with
/// respect to every other operation on the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    state: Arc<Mutex<JobTable>>,
}

impl MemoryJobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs across all units.
    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    /// Whether the store holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, unit_id: UnitId, payload: Value) -> AppResult<Job> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let job = Job {
            id: JobId::from(state.last_id),
            unit_id,
            payload,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        state.rows.insert(job.id, job.clone());
        Ok(job)
    }

    async fn claim_one_eligible(&self, unit_id: UnitId) -> AppResult<Option<Job>> {
        let mut state = self.state.lock().await;

        let candidate = state
            .rows
            .values()
            .filter(|job| job.unit_id == unit_id && job.status == JobStatus::Pending)
            .min_by_key(|job| (job.created_at, job.id))
            .map(|job| job.id);

        let Some(job_id) = candidate else {
            return Ok(None);
        };

        let job = state
            .rows
            .get_mut(&job_id)
            .ok_or_else(|| AppError::internal("Claimed row vanished"))?;
        job.mark_processing()?;

        debug!(unit_id = %unit_id, job_id = %job_id, "Claimed job row");
        Ok(Some(job.clone()))
    }

    async fn complete_if_processing(&self, unit_id: UnitId, job_id: JobId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.rows.get_mut(&job_id) {
            Some(job) if job.is_owned_by(unit_id) && job.status == JobStatus::Processing => {
                job.mark_completed(Utc::now())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_history(&self, unit_id: UnitId, limit: i64) -> AppResult<Vec<Job>> {
        let state = self.state.lock().await;
        let mut jobs: Vec<Job> = state
            .rows
            .values()
            .filter(|job| job.is_owned_by(unit_id))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        jobs.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(jobs)
    }

    async fn fetch_payload(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Value>> {
        Ok(self
            .find(unit_id, job_id)
            .await?
            .map(|job| job.payload))
    }

    async fn find(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Job>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .get(&job_id)
            .filter(|job| job.is_owned_by(unit_id))
            .cloned())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// In-memory user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }
        let user = User {
            id: UserId::from(users.len() as i64 + 1),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            unit_id: data.unit_id,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}
