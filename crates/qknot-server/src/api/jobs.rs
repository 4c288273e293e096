//! Runtime job endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};

use qknot_jobs::{CompletedJob, JobSnapshot, PollOutcome, SubmitResponse};

use crate::dto::{ApiJson, JobRequest, SubmitJobRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/jobs/submit - Compile a braid word and submit it.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SubmitJobRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submit = request.to_submit_request()?;
    let target = request.runtime.target(&state.config)?;
    Ok(Json(state.manager.submit(&target, &submit).await?))
}

/// POST /api/jobs/poll - Read a job's status and, when finished, its results.
pub async fn poll(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<JobRequest>,
) -> Result<Json<PollOutcome>, ApiError> {
    let target = request.runtime.target(&state.config)?;
    Ok(Json(state.manager.poll(&target, &request.job_id()).await?))
}

/// POST /api/jobs/cancel - Request cancellation.
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<JobRequest>,
) -> Result<Json<JobSnapshot>, ApiError> {
    let target = request.runtime.target(&state.config)?;
    Ok(Json(state.manager.cancel(&target, &request.job_id()).await?))
}

/// POST /api/run-experiment - Submit and wait for the formatted result.
pub async fn run_experiment(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SubmitJobRequest>,
) -> Result<Json<CompletedJob>, ApiError> {
    let submit = request.to_submit_request()?;
    let target = request.runtime.target(&state.config)?;
    Ok(Json(state.manager.run(&target, &submit).await?))
}
