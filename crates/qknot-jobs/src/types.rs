//! Request and response types of the job lifecycle.

use std::fmt;

use qknot_circuit::{CircuitSummary, ClosureMethod, OptimizationLevel};
use qknot_hal::{BackendInfo, ExpectationSummary, JobStatus};
use serde::Serialize;

/// Backend name reported when the service does not name one.
pub const UNKNOWN_BACKEND: &str = "unknown";

/// Detail attached to cancellation responses.
pub const CANCELLATION_DETAIL: &str = "Cancellation requested.";

/// Credential and channel preferences for one runtime call.
#[derive(Clone, Default)]
pub struct RuntimeTarget {
    /// Service credential; never logged or persisted.
    pub token: String,
    /// Explicit channel, or `None` for automatic resolution.
    pub channel: Option<String>,
    /// Optional service instance.
    pub instance: Option<String>,
}

impl RuntimeTarget {
    /// Target with automatic channel resolution.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            channel: None,
            instance: None,
        }
    }

    /// Set an explicit channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set the service instance.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl fmt::Debug for RuntimeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeTarget")
            .field("token", &"[REDACTED]")
            .field("channel", &self.channel)
            .field("instance", &self.instance)
            .finish()
    }
}

/// A job submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Backend name or `least_busy`.
    pub backend_name: String,
    /// Braid word to compile.
    pub braid_word: String,
    /// Shots, `1..=MAX_SHOTS`.
    pub shots: u32,
    pub optimization_level: OptimizationLevel,
    pub closure_method: ClosureMethod,
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub backend: String,
    pub runtime_channel_used: String,
    pub runtime_instance_used: Option<String>,
    pub closure_method: ClosureMethod,
    pub circuit_summary: CircuitSummary,
    /// Immediate status; `SUBMITTED` when the service reports none.
    pub status: JobStatus,
}

/// Status-level view of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub backend: String,
    pub runtime_channel_used: String,
    pub runtime_instance_used: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A finished job with formatted results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedJob {
    pub job_id: String,
    pub backend: String,
    pub runtime_channel_used: String,
    pub runtime_instance_used: Option<String>,
    #[serde(flatten)]
    pub summary: ExpectationSummary,
    /// Always `COMPLETED`.
    pub status: JobStatus,
}

/// Outcome of a poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PollOutcome {
    /// Failed terminal status; `detail` carries the job's error message.
    Failed(JobSnapshot),
    /// Still queued or running.
    Pending(JobSnapshot),
    /// Results extracted.
    Completed(CompletedJob),
    /// Status readable but results not extractable yet; `detail` says why.
    Partial(JobSnapshot),
}

impl PollOutcome {
    /// The canonical status in this outcome.
    pub fn status(&self) -> &JobStatus {
        match self {
            PollOutcome::Failed(s) | PollOutcome::Pending(s) | PollOutcome::Partial(s) => &s.status,
            PollOutcome::Completed(c) => &c.status,
        }
    }

    /// The job id in this outcome.
    pub fn job_id(&self) -> &str {
        match self {
            PollOutcome::Failed(s) | PollOutcome::Pending(s) | PollOutcome::Partial(s) => &s.job_id,
            PollOutcome::Completed(c) => &c.job_id,
        }
    }
}

/// Accessible backends and a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendListing {
    pub runtime_channel_used: String,
    pub runtime_instance_used: Option<String>,
    pub recommended_backend: Option<String>,
    /// Sorted by pending jobs (unknown last), then name.
    pub backends: Vec<BackendInfo>,
}

/// Offline circuit compilation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitArtifact {
    /// Requested target, or `unspecified`.
    pub target_backend: String,
    pub optimization_level: OptimizationLevel,
    pub closure_method: ClosureMethod,
    pub braid_word: String,
    pub circuit_summary: CircuitSummary,
}
