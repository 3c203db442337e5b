//! Job handlers for producers and consumers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use printq_core::error::AppError;
use printq_core::types::UnitId;
use printq_entity::job::Job;

use crate::dto::request::{EnqueueRequest, HistoryQuery};
use crate::dto::response::{JobCreatedResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthConsumer, Producer, ValidatedJson, parse_job_id};
use crate::state::AppState;

/// POST /jobs/new
pub async fn enqueue(
    State(state): State<AppState>,
    _producer: Producer,
    ValidatedJson(req): ValidatedJson<EnqueueRequest>,
) -> ApiResult<(StatusCode, Json<JobCreatedResponse>)> {
    let payload = req.job_data.ok_or_else(|| {
        AppError::validation("job_data is required and must be a JSON object")
    })?;

    let job = state
        .queue
        .enqueue(UnitId::from(req.unit_id), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse {
            message: "Job added to the queue".to_string(),
            job_id: job.id,
        }),
    ))
}

/// GET /jobs/next
///
/// 200 with the claimed job, or 204 when nothing is pending.
pub async fn claim_next(
    State(state): State<AppState>,
    consumer: AuthConsumer,
) -> ApiResult<Response> {
    let response = match state.queue.claim_next(consumer.unit_id).await? {
        Some(job) => {
            debug!(
                user_id = %consumer.user_id,
                username = %consumer.username,
                job_id = %job.id,
                "Job handed to consumer"
            );
            Json(job).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

/// POST /jobs/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    consumer: AuthConsumer,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let job_id = parse_job_id(&id)?;
    state.queue.complete_job(consumer.unit_id, job_id).await?;
    debug!(
        user_id = %consumer.user_id,
        username = %consumer.username,
        job_id = %job_id,
        "Consumer reported completion"
    );

    Ok(Json(MessageResponse::new(format!(
        "Job {job_id} marked as completed"
    ))))
}

/// GET /jobs/history
pub async fn history(
    State(state): State<AppState>,
    consumer: AuthConsumer,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Job>>> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let jobs = state
        .history
        .get_history(consumer.unit_id, query.limit)
        .await?;
    Ok(Json(jobs))
}

/// POST /jobs/{id}/reprint
pub async fn reprint(
    State(state): State<AppState>,
    consumer: AuthConsumer,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<JobCreatedResponse>)> {
    let original = parse_job_id(&id)?;
    let job = state.history.reprint(consumer.unit_id, original).await?;
    debug!(
        user_id = %consumer.user_id,
        username = %consumer.username,
        original_id = %original,
        job_id = %job.id,
        "Consumer requested reprint"
    );

    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse {
            message: format!("Job {original} queued for reprint"),
            job_id: job.id,
        }),
    ))
}

/// GET /jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    consumer: AuthConsumer,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job_id = parse_job_id(&id)?;
    let job = state.queue.find(consumer.unit_id, job_id).await?;
    Ok(Json(job))
}
