//! History listing and reprint of past jobs.

use std::sync::Arc;

use tracing::info;

use printq_core::error::AppError;
use printq_core::result::AppResult;
use printq_core::types::{JobId, UnitId};
use printq_entity::job::{Job, annotate_reprint};

use crate::queue::QueueEngine;

/// Read-only history plus reprint, layered on the queue engine.
#[derive(Debug, Clone)]
pub struct HistoryService {
    /// Queue engine used for reads and for enqueueing reprints.
    engine: Arc<QueueEngine>,
}

impl HistoryService {
    /// Creates a new history service.
    pub fn new(engine: Arc<QueueEngine>) -> Self {
        Self { engine }
    }

    /// Largest accepted history limit, also used when none is given.
    pub fn max_limit(&self) -> i64 {
        self.engine.config().history_max_limit
    }

    /// Newest-first jobs of the unit in every status.
    pub async fn get_history(&self, unit_id: UnitId, limit: Option<i64>) -> AppResult<Vec<Job>> {
        let max = self.max_limit();
        let limit = limit.unwrap_or(max);
        if !(1..=max).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {max}"
            )));
        }
        self.engine.history(unit_id, limit).await
    }

    /// Queue a copy of one of the unit's jobs.
    ///
    /// The copy is a new pending job whose payload carries `reprintOf`
    /// pointing at `original_id`. The original row is left as is.
    pub async fn reprint(&self, unit_id: UnitId, original_id: JobId) -> AppResult<Job> {
        let payload = self
            .engine
            .payload(unit_id, original_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Job {original_id} not found")))?;

        let payload = annotate_reprint(&payload, original_id)?;
        let job = self.engine.enqueue(unit_id, payload).await?;

        info!(
            unit_id = %unit_id,
            job_id = %job.id,
            reprint_of = %original_id,
            "Job reprinted"
        );
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printq_core::ErrorKind;
    use printq_core::config::QueueConfig;
    use printq_database::MemoryJobStore;
    use printq_entity::job::JobStatus;
    use serde_json::json;

    const UNIT_1: UnitId = UnitId::new(1);
    const UNIT_2: UnitId = UnitId::new(2);

    fn services() -> (Arc<QueueEngine>, HistoryService) {
        let engine = Arc::new(QueueEngine::new(
            Arc::new(MemoryJobStore::new()),
            QueueConfig::default(),
        ));
        (engine.clone(), HistoryService::new(engine))
    }

    #[tokio::test]
    async fn test_reprint_of_completed_job() {
        let (engine, history) = services();
        let original = engine.enqueue(UNIT_1, json!({"orderId": "A1"})).await.unwrap();
        engine.claim_next(UNIT_1).await.unwrap();
        engine.complete_job(UNIT_1, original.id).await.unwrap();
        let completed = engine.find(UNIT_1, original.id).await.unwrap();

        let copy = history.reprint(UNIT_1, original.id).await.unwrap();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.status, JobStatus::Pending);
        assert_eq!(copy.unit_id, UNIT_1);
        assert_eq!(
            copy.payload,
            json!({"orderId": "A1", "reprintOf": original.id.get()})
        );

        let after = engine.find(UNIT_1, original.id).await.unwrap();
        assert_eq!(after, completed);
    }

    #[tokio::test]
    async fn test_reprint_of_reprint_points_one_hop_back() {
        let (engine, history) = services();
        let original = engine.enqueue(UNIT_1, json!({"doc": "x"})).await.unwrap();
        let first = history.reprint(UNIT_1, original.id).await.unwrap();
        let second = history.reprint(UNIT_1, first.id).await.unwrap();

        assert_eq!(second.payload["reprintOf"], json!(first.id.get()));
        assert_eq!(second.payload["doc"], "x");
    }

    #[tokio::test]
    async fn test_reprint_hides_other_units() {
        let (engine, history) = services();
        let job = engine.enqueue(UNIT_2, json!({"orderId": "B1"})).await.unwrap();

        let err = history.reprint(UNIT_1, job.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = history.reprint(UNIT_1, JobId::from(12345)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_history_is_scoped_and_bounded() {
        let (engine, history) = services();
        for n in 0..5 {
            engine.enqueue(UNIT_1, json!({"n": n})).await.unwrap();
        }
        engine.enqueue(UNIT_2, json!({"n": "other"})).await.unwrap();
        engine.claim_next(UNIT_1).await.unwrap();

        let all = history.get_history(UNIT_1, None).await.unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|job| job.unit_id == UNIT_1));
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));
        assert!(all.iter().any(|job| job.status == JobStatus::Processing));

        let two = history.get_history(UNIT_1, Some(2)).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].id, all[0].id);
    }

    #[tokio::test]
    async fn test_history_limit_out_of_range() {
        let (_, history) = services();
        for limit in [0, -1, 101] {
            let err = history.get_history(UNIT_1, Some(limit)).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert!(history.get_history(UNIT_1, Some(100)).await.unwrap().is_empty());
    }
}
