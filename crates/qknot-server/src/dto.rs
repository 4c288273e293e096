//! Request and response bodies of the HTTP API.
//!
//! Request strings are trimmed on the way in. Blank optional strings become
//! `None`; blank required strings are left empty for the core to reject.

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};

use qknot_circuit::{ClosureMethod, OptimizationLevel};
use qknot_jobs::{RuntimeTarget, SubmitRequest, check_shots};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// `Json` extractor whose rejections render as `{"detail": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

fn default_optimization_level() -> i64 {
    3
}

fn default_closure_method() -> String {
    "trace".to_string()
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_level(level: i64) -> Result<OptimizationLevel, ApiError> {
    Ok(OptimizationLevel::new(level)?)
}

fn parse_closure(closure_method: &str) -> Result<ClosureMethod, ApiError> {
    Ok(closure_method.trim().parse::<ClosureMethod>()?)
}

// ============================================================================
// Knot routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct KnotIngestionRequest {
    pub dowker_notation: String,
}

#[derive(Debug, Deserialize)]
pub struct KnotVerificationRequest {
    pub braid_word: String,
}

/// Request to compile a braid word offline.
#[derive(Debug, Deserialize)]
pub struct CircuitGenerationRequest {
    pub braid_word: String,
    /// Optimization level (0-3).
    #[serde(default = "default_optimization_level")]
    pub optimization_level: i64,
    /// `trace` or `plat`.
    #[serde(default = "default_closure_method")]
    pub closure_method: String,
    #[serde(default)]
    pub target_backend: Option<String>,
}

impl CircuitGenerationRequest {
    /// Validated level and closure method.
    pub fn options(&self) -> Result<(OptimizationLevel, ClosureMethod), ApiError> {
        Ok((
            parse_level(self.optimization_level)?,
            parse_closure(&self.closure_method)?,
        ))
    }

    pub fn target_backend(&self) -> Option<String> {
        optional(self.target_backend.as_deref())
    }
}

// ============================================================================
// Runtime routes
// ============================================================================

/// Credential and channel preferences shared by every runtime route.
#[derive(Debug, Default, Deserialize)]
pub struct RuntimeFields {
    #[serde(default, alias = "ibm_token")]
    pub credential: Option<String>,
    #[serde(default, alias = "channel")]
    pub runtime_channel: Option<String>,
    #[serde(default, alias = "instance")]
    pub runtime_instance: Option<String>,
}

impl RuntimeFields {
    /// Resolve the credential and build the runtime target.
    pub fn target(&self, config: &ServerConfig) -> Result<RuntimeTarget, ApiError> {
        let mut target = RuntimeTarget::new(config.resolve_credential(self.credential.as_deref())?);
        target.channel = optional(self.runtime_channel.as_deref());
        target.instance = optional(self.runtime_instance.as_deref());
        Ok(target)
    }
}

/// Request to submit a braid experiment.
#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    /// Backend name or `least_busy`.
    pub backend_name: String,
    pub braid_word: String,
    pub shots: i64,
    #[serde(default = "default_optimization_level")]
    pub optimization_level: i64,
    #[serde(default = "default_closure_method")]
    pub closure_method: String,
    #[serde(flatten)]
    pub runtime: RuntimeFields,
}

impl SubmitJobRequest {
    /// Validate numeric and enum fields and build the core request.
    pub fn to_submit_request(&self) -> Result<SubmitRequest, ApiError> {
        Ok(SubmitRequest {
            backend_name: trimmed(&self.backend_name),
            braid_word: trimmed(&self.braid_word),
            shots: check_shots(self.shots)?,
            optimization_level: parse_level(self.optimization_level)?,
            closure_method: parse_closure(&self.closure_method)?,
        })
    }
}

/// Request addressing an existing job (poll and cancel).
#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_id: String,
    #[serde(flatten)]
    pub runtime: RuntimeFields,
}

impl JobRequest {
    pub fn job_id(&self) -> String {
        trimmed(&self.job_id)
    }
}

/// Request to list backends.
#[derive(Debug, Default, Deserialize)]
pub struct RuntimeServiceRequest {
    #[serde(flatten)]
    pub runtime: RuntimeFields,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok" }
    }
}
