//! Offline knot endpoints: Dowker ingestion, braid verification, circuit generation.

use std::sync::Arc;

use axum::{Json, extract::State};

use qknot_braid::{
    DowkerCompilation, VerificationReport, compile_dowker_notation, verify_topological_mapping,
};
use qknot_jobs::CircuitArtifact;

use crate::dto::{
    ApiJson, CircuitGenerationRequest, KnotIngestionRequest, KnotVerificationRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/knot/ingest - Compile Dowker notation to a braid word.
pub async fn ingest(
    ApiJson(request): ApiJson<KnotIngestionRequest>,
) -> Result<Json<DowkerCompilation>, ApiError> {
    Ok(Json(compile_dowker_notation(request.dowker_notation.trim())?))
}

/// POST /api/knot/verify - Check a braid word against the execution policy.
pub async fn verify(
    ApiJson(request): ApiJson<KnotVerificationRequest>,
) -> Result<Json<VerificationReport>, ApiError> {
    Ok(Json(verify_topological_mapping(request.braid_word.trim())?))
}

/// POST /api/knot/circuit/generate - Build and transpile the evaluation circuit.
pub async fn generate_circuit(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CircuitGenerationRequest>,
) -> Result<Json<CircuitArtifact>, ApiError> {
    let (level, closure) = request.options()?;
    let target_backend = request.target_backend();

    let artifact = state.manager.generate_circuit_artifact(
        request.braid_word.trim(),
        level,
        closure,
        target_backend.as_deref(),
    )?;

    Ok(Json(artifact))
}
