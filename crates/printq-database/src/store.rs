//! Storage abstractions for jobs and consumer accounts.

use async_trait::async_trait;
use serde_json::Value;

use printq_core::result::AppResult;
use printq_core::types::{JobId, UnitId};
use printq_entity::job::Job;
use printq_entity::user::{CreateUser, User};

/// Durable, tenant-scoped job storage.
///
/// Every operation is scoped to a unit: a job owned by another unit is
/// indistinguishable from a job that does not exist. Implementations never
/// retry.
///
/// `ErrorKind::ServiceUnavailable` means the operation is known not to have
/// taken effect, and callers may retry it. A failure that may have followed
/// a committed write (claim or completion) is reported as
/// `ErrorKind::Database` instead, so it is never replayed.
///
/// Two implementations are provided:
/// - Postgres (row locks with `FOR UPDATE SKIP LOCKED`)
/// - In-memory (a single `tokio::sync::Mutex` held across select and update)
#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// Insert a new `pending` job and return the stored row.
    async fn insert(&self, unit_id: UnitId, payload: Value) -> AppResult<Job>;

    /// Atomically take the oldest pending job of the unit and mark it `processing`.
    ///
    /// Returns `None` when the unit has no pending job that is not already
    /// being claimed by a concurrent caller.
    async fn claim_one_eligible(&self, unit_id: UnitId) -> AppResult<Option<Job>>;

    /// Move a `processing` job of the unit to `completed`.
    ///
    /// Returns `false` when the job does not exist, belongs to another
    /// unit, or is not `processing`.
    async fn complete_if_processing(&self, unit_id: UnitId, job_id: JobId) -> AppResult<bool>;

    /// Jobs of the unit in every status, newest first, at most `limit`.
    async fn list_history(&self, unit_id: UnitId, limit: i64) -> AppResult<Vec<Job>>;

    /// Read the payload of a job owned by the unit.
    async fn fetch_payload(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Value>>;

    /// Look up a single job owned by the unit.
    async fn find(&self, unit_id: UnitId, job_id: JobId) -> AppResult<Option<Job>>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Consumer account storage.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a user. A taken username yields `ErrorKind::Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}
