//! Job lifecycle state machine.
//!
//! ```text
//!   submit ──→ QUEUED/RUNNING ──poll──→ COMPLETED (counts, expectation)
//!                  │
//!                  ├──poll──→ ERROR/FAILED/CANCELLED (detail)
//!                  │
//!                  └──cancel──→ CANCEL_REQUESTED (advisory)
//! ```
//!
//! Every operation resolves a fresh session and re-reads job state from the
//! service. Nothing is cached between calls.

use std::sync::Arc;

use qknot_braid::validate_braid;
use qknot_circuit::{
    ClosureMethod, CompiledCircuit, LocalTranspiler, OptimizationLevel, Transpiler,
    compile_braid_circuit,
};
use qknot_hal::{
    Backend, BackendFilter, BackendInfo, ChannelResolver, ExpectationSummary, HalError,
    JobStatus, RuntimeJob, RuntimeSession, ServiceConnector, StatusClass, ensure_capacity,
    least_busy_hardware, resolve_error_message, resolve_status, select_backend,
};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::config::{JobManagerConfig, WaitPolicy, check_shots};
use crate::error::{JobError, JobResult};
use crate::types::{
    BackendListing, CANCELLATION_DETAIL, CircuitArtifact, CompletedJob, JobSnapshot, PollOutcome,
    RuntimeTarget, SubmitRequest, SubmitResponse, UNKNOWN_BACKEND,
};

/// Target name reported by artifacts compiled without a backend.
const UNSPECIFIED_TARGET: &str = "unspecified";

/// Submits, polls, and cancels knot jobs against a runtime service.
pub struct JobLifecycleManager {
    connector: Arc<dyn ServiceConnector>,
    transpiler: Arc<dyn Transpiler>,
    resolver: ChannelResolver,
    config: JobManagerConfig,
}

/// A dispatched job with the context it was submitted under.
struct Dispatched {
    job: Box<dyn RuntimeJob>,
    backend: Arc<dyn Backend>,
    session: RuntimeSession,
    compiled: CompiledCircuit,
}

impl JobLifecycleManager {
    /// Manager with default configuration and the local transpiler.
    pub fn new(connector: Arc<dyn ServiceConnector>) -> Self {
        Self::with_config(connector, JobManagerConfig::default())
    }

    /// Manager with explicit configuration.
    pub fn with_config(connector: Arc<dyn ServiceConnector>, config: JobManagerConfig) -> Self {
        Self {
            connector,
            transpiler: Arc::new(LocalTranspiler::new()),
            resolver: ChannelResolver::new(config.channel_candidates.clone()),
            config,
        }
    }

    /// Replace the fallback transpiler used when a backend has none.
    pub fn with_transpiler(mut self, transpiler: Arc<dyn Transpiler>) -> Self {
        self.transpiler = transpiler;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &JobManagerConfig {
        &self.config
    }

    /// Compile a braid word offline and summarize the transpiled circuit.
    pub fn generate_circuit_artifact(
        &self,
        braid_word: &str,
        optimization_level: OptimizationLevel,
        closure_method: ClosureMethod,
        target_backend: Option<&str>,
    ) -> JobResult<CircuitArtifact> {
        let analysis = validate_braid(braid_word)?;
        let compiled = compile_braid_circuit(
            &analysis,
            closure_method,
            optimization_level,
            self.transpiler.as_ref(),
        )?;

        Ok(CircuitArtifact {
            target_backend: target_backend
                .filter(|t| !t.is_empty())
                .unwrap_or(UNSPECIFIED_TARGET)
                .to_string(),
            optimization_level,
            closure_method,
            braid_word: braid_word.to_string(),
            circuit_summary: compiled.summary,
        })
    }

    /// Submit a job and return its immediate status.
    pub async fn submit(
        &self,
        target: &RuntimeTarget,
        request: &SubmitRequest,
    ) -> JobResult<SubmitResponse> {
        let dispatched = self.dispatch(target, request).await?;
        let status = resolve_status(dispatched.job.as_ref())
            .await
            .or_placeholder(JobStatus::SUBMITTED);

        info!(
            job_id = %dispatched.job.job_id(),
            backend = %dispatched.backend.name(),
            %status,
            "job submitted"
        );

        Ok(SubmitResponse {
            job_id: dispatched.job.job_id().to_string(),
            backend: dispatched.backend.name().to_string(),
            runtime_channel_used: dispatched.session.channel_used,
            runtime_instance_used: dispatched.session.instance_used,
            closure_method: request.closure_method,
            circuit_summary: dispatched.compiled.summary,
            status,
        })
    }

    /// Read a job's status and, when finished, its results.
    pub async fn poll(&self, target: &RuntimeTarget, job_id: &str) -> JobResult<PollOutcome> {
        let job_id = require(job_id, "Job id")?;
        let session = self.resolve_session(target).await?;
        let job = fetch_job(&session, job_id).await?;

        let status = resolve_status(job.as_ref()).await;
        let backend = job.backend_name().await;
        debug!(%job_id, %status, "polled job");

        match status.class() {
            StatusClass::Failed => {
                let detail = resolve_error_message(job.as_ref()).await;
                Ok(PollOutcome::Failed(snapshot(
                    job.as_ref(),
                    backend,
                    &session,
                    status,
                    detail,
                )))
            }
            StatusClass::InProgress => Ok(PollOutcome::Pending(snapshot(
                job.as_ref(),
                backend,
                &session,
                status,
                None,
            ))),
            class @ (StatusClass::Completed | StatusClass::Unknown) => {
                match format_completed(job.as_ref(), &session, backend.clone()).await {
                    Ok(completed) => Ok(PollOutcome::Completed(completed)),
                    Err(e) if class == StatusClass::Unknown => {
                        debug!(%job_id, error = %e, "results not available yet");
                        Ok(PollOutcome::Partial(snapshot(
                            job.as_ref(),
                            backend,
                            &session,
                            status,
                            Some(e.to_string()),
                        )))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Request cancellation. Does not wait for the service to apply it.
    pub async fn cancel(&self, target: &RuntimeTarget, job_id: &str) -> JobResult<JobSnapshot> {
        let job_id = require(job_id, "Job id")?;
        let session = self.resolve_session(target).await?;
        let job = fetch_job(&session, job_id).await?;

        job.cancel().await.map_err(|e| HalError::CancelFailed {
            job_id: job_id.to_string(),
            reason: e.to_string(),
        })?;

        let status = resolve_status(job.as_ref())
            .await
            .or_placeholder(JobStatus::CANCEL_REQUESTED);
        let backend = job.backend_name().await;
        info!(%job_id, %status, "job cancellation requested");

        Ok(snapshot(
            job.as_ref(),
            backend,
            &session,
            status,
            Some(CANCELLATION_DETAIL.to_string()),
        ))
    }

    /// Submit and wait for completion using the configured wait policy.
    pub async fn run(
        &self,
        target: &RuntimeTarget,
        request: &SubmitRequest,
    ) -> JobResult<CompletedJob> {
        self.run_with_policy(target, request, self.config.wait).await
    }

    /// Submit and poll caller-side until the job is terminal or the budget runs out.
    pub async fn run_with_policy(
        &self,
        target: &RuntimeTarget,
        request: &SubmitRequest,
        policy: WaitPolicy,
    ) -> JobResult<CompletedJob> {
        let dispatched = self.dispatch(target, request).await?;
        let job = dispatched.job.as_ref();
        let backend_hint = Some(dispatched.backend.name().to_string());

        for _ in 0..policy.max_polls {
            let status = resolve_status(job).await;
            match status.class() {
                StatusClass::Completed => {
                    return format_completed(job, &dispatched.session, backend_hint).await;
                }
                StatusClass::Failed => {
                    let message = resolve_error_message(job)
                        .await
                        .unwrap_or_else(|| status.to_string());
                    return Err(HalError::JobFailed(message).into());
                }
                StatusClass::InProgress | StatusClass::Unknown => {
                    tokio::time::sleep(policy.poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job.job_id().to_string()).into())
    }

    /// List accessible hardware and recommend the least busy backend.
    pub async fn list_backends(&self, target: &RuntimeTarget) -> JobResult<BackendListing> {
        let session = self.resolve_session(target).await?;
        let service = session.service.as_ref();

        let backends = match service.backends(&BackendFilter::operational_hardware()).await {
            Err(HalError::Unsupported(reason)) => {
                debug!(%reason, "operational filter unsupported; listing non-simulators");
                let filter = BackendFilter {
                    simulator: Some(false),
                    ..BackendFilter::default()
                };
                service.backends(&filter).await
            }
            other => other,
        }
        .map_err(|e| HalError::BackendListing(e.to_string()))?;

        let mut seen = FxHashSet::default();
        let mut entries: Vec<BackendInfo> = backends
            .iter()
            .filter(|b| seen.insert(b.name().to_string()))
            .map(|b| BackendInfo::from_backend(&**b))
            .collect();
        entries.sort_by(|a, b| {
            (a.pending_jobs.unwrap_or(u32::MAX), &a.name)
                .cmp(&(b.pending_jobs.unwrap_or(u32::MAX), &b.name))
        });

        let recommended_backend = match least_busy_hardware(service, self.config.min_qubits).await {
            Ok(backend) => Some(backend.name().to_string()),
            Err(e) => {
                warn!(error = %e, "least busy selection failed; recommending first listed backend");
                entries.first().map(|b| b.name.clone())
            }
        };

        Ok(BackendListing {
            runtime_channel_used: session.channel_used,
            runtime_instance_used: session.instance_used,
            recommended_backend,
            backends: entries,
        })
    }

    async fn resolve_session(&self, target: &RuntimeTarget) -> JobResult<RuntimeSession> {
        let channel = target.channel.as_deref().filter(|c| !c.trim().is_empty());
        let instance = target.instance.as_deref().filter(|i| !i.trim().is_empty());
        Ok(self
            .resolver
            .resolve(self.connector.as_ref(), &target.token, channel, instance)
            .await?)
    }

    /// Validate, resolve, select, compile, and submit.
    async fn dispatch(
        &self,
        target: &RuntimeTarget,
        request: &SubmitRequest,
    ) -> JobResult<Dispatched> {
        let backend_name = require(&request.backend_name, "Backend name")?;
        check_shots(i64::from(request.shots))?;
        let analysis = validate_braid(&request.braid_word)?;

        let session = self.resolve_session(target).await?;
        let backend =
            select_backend(session.service.as_ref(), backend_name, self.config.min_qubits).await?;
        ensure_capacity(backend.as_ref(), analysis.required_qubits)?;

        let transpiler = backend.transpiler().unwrap_or_else(|| Arc::clone(&self.transpiler));
        let compiled = compile_braid_circuit(
            &analysis,
            request.closure_method,
            request.optimization_level,
            transpiler.as_ref(),
        )?;

        let job = session
            .service
            .submit(backend.as_ref(), &compiled.transpiled, request.shots)
            .await?;

        Ok(Dispatched {
            job,
            backend,
            session,
            compiled,
        })
    }
}

fn require<'a>(value: &'a str, field: &'static str) -> JobResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(JobError::EmptyField { field })
    } else {
        Ok(trimmed)
    }
}

async fn fetch_job(session: &RuntimeSession, job_id: &str) -> JobResult<Box<dyn RuntimeJob>> {
    session.service.job(job_id).await.map_err(|e| {
        JobError::from(HalError::JobRetrieval {
            job_id: job_id.to_string(),
            reason: e.to_string(),
        })
    })
}

fn snapshot(
    job: &dyn RuntimeJob,
    backend: Option<String>,
    session: &RuntimeSession,
    status: JobStatus,
    detail: Option<String>,
) -> JobSnapshot {
    JobSnapshot {
        job_id: job.job_id().to_string(),
        backend: backend.unwrap_or_else(|| UNKNOWN_BACKEND.to_string()),
        runtime_channel_used: session.channel_used.clone(),
        runtime_instance_used: session.instance_used.clone(),
        status,
        detail,
    }
}

/// Extract counts from a finished job and format them.
async fn format_completed(
    job: &dyn RuntimeJob,
    session: &RuntimeSession,
    backend_hint: Option<String>,
) -> JobResult<CompletedJob> {
    let result = job.result().await?;
    let summary = ExpectationSummary::from_counts(result.first_counts()?);

    let backend = match backend_hint {
        Some(name) => name,
        None => job
            .backend_name()
            .await
            .unwrap_or_else(|| UNKNOWN_BACKEND.to_string()),
    };

    Ok(CompletedJob {
        job_id: job.job_id().to_string(),
        backend,
        runtime_channel_used: session.channel_used.clone(),
        runtime_instance_used: session.instance_used.clone(),
        summary,
        status: JobStatus::completed(),
    })
}
