//! Remote job interface.

use async_trait::async_trait;

use crate::error::HalResult;
use crate::result::SamplerResult;
use crate::status::JobStatus;

/// A job handle obtained from a runtime service.
#[async_trait]
pub trait RuntimeJob: Send + Sync {
    /// Service-assigned job id.
    fn job_id(&self) -> &str;

    /// Raw status as reported by the service.
    async fn status(&self) -> HalResult<String>;

    /// Name of the backend the job runs on.
    async fn backend_name(&self) -> Option<String> {
        None
    }

    /// Human-readable failure reason, if any.
    async fn error_message(&self) -> Option<String> {
        None
    }

    /// Sampler result of a finished job.
    async fn result(&self) -> HalResult<SamplerResult>;

    /// Request cancellation. Jobs that cannot be cancelled do nothing.
    async fn cancel(&self) -> HalResult<()> {
        Ok(())
    }
}

/// Read and normalize a job's status; read failures become `UNKNOWN`.
pub async fn resolve_status(job: &dyn RuntimeJob) -> JobStatus {
    match job.status().await {
        Ok(raw) => JobStatus::normalize(&raw),
        Err(_) => JobStatus::unknown(),
    }
}

/// A job's error message, with blank messages treated as absent.
pub async fn resolve_error_message(job: &dyn RuntimeJob) -> Option<String> {
    job.error_message().await.filter(|m| !m.trim().is_empty())
}
