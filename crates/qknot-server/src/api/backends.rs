//! Backend listing endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use qknot_jobs::BackendListing;

use crate::dto::{ApiJson, RuntimeServiceRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/backends - List accessible backends and recommend one.
pub async fn list_backends(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RuntimeServiceRequest>,
) -> Result<Json<BackendListing>, ApiError> {
    let target = request.runtime.target(&state.config)?;
    Ok(Json(state.manager.list_backends(&target).await?))
}
