//! In-memory runtime fakes for tests.
//!
//! Enabled with the `testing` feature. [`FakeConnector`] hands out a shared
//! [`FakeService`] per channel according to a script, and jobs replay a list
//! of raw statuses, one per status read.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use qknot_circuit::Circuit;

use crate::backend::{Backend, BackendFilter};
use crate::error::{HalError, HalResult};
use crate::job::RuntimeJob;
use crate::result::{Counts, PubResult, SamplerResult};
use crate::service::{ChannelRequest, ConnectError, RuntimeService, ServiceConnector};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A backend with fixed capabilities.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pub name: String,
    pub num_qubits: Option<u32>,
    pub pending_jobs: Option<u32>,
    pub operational: Option<bool>,
    pub simulator: Option<bool>,
}

impl FakeBackend {
    /// Operational hardware.
    pub fn hardware(name: &str, num_qubits: u32, pending_jobs: u32) -> Self {
        Self {
            name: name.to_string(),
            num_qubits: Some(num_qubits),
            pending_jobs: Some(pending_jobs),
            operational: Some(true),
            simulator: Some(false),
        }
    }

    /// Operational simulator.
    pub fn simulator(name: &str, num_qubits: u32) -> Self {
        Self {
            simulator: Some(true),
            ..Self::hardware(name, num_qubits, 0)
        }
    }
}

impl Backend for FakeBackend {
    fn name(&self) -> &str {
        &self.name
    }
    fn num_qubits(&self) -> Option<u32> {
        self.num_qubits
    }
    fn pending_jobs(&self) -> Option<u32> {
        self.pending_jobs
    }
    fn operational(&self) -> Option<bool> {
        self.operational
    }
    fn is_simulator(&self) -> Option<bool> {
        self.simulator
    }
}

/// Scripted behaviour of one job.
#[derive(Debug, Clone)]
pub struct JobScript {
    /// Raw statuses returned by successive status reads; the last one repeats.
    pub statuses: Vec<String>,
    /// Backend name the job reports.
    pub backend_name: Option<String>,
    /// Error message the job reports.
    pub error_message: Option<String>,
    /// What `result()` returns.
    pub result: Result<SamplerResult, HalError>,
    /// Error returned by `cancel()`, if any.
    pub cancel_error: Option<String>,
}

impl JobScript {
    /// Statuses followed by a `c` register with the given ancilla counts.
    pub fn completing(statuses: &[&str], zeros: u64, ones: u64) -> Self {
        let counts: Counts = [("0".to_string(), zeros), ("1".to_string(), ones)]
            .into_iter()
            .collect();
        Self {
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
            backend_name: None,
            error_message: None,
            result: Ok(SamplerResult {
                pubs: vec![PubResult::with_register("c", counts)],
            }),
            cancel_error: None,
        }
    }

    /// A job that fails with `message`.
    pub fn failing(status: &str, message: &str) -> Self {
        Self {
            statuses: vec![status.to_string()],
            backend_name: None,
            error_message: Some(message.to_string()),
            result: Err(HalError::JobFailed(message.to_string())),
            cancel_error: None,
        }
    }

    /// Same script with a different result.
    pub fn with_result(mut self, result: Result<SamplerResult, HalError>) -> Self {
        self.result = result;
        self
    }
}

#[derive(Debug)]
struct JobState {
    script: JobScript,
    reads: usize,
    cancel_requests: usize,
}

/// Job handle backed by shared state.
pub struct FakeJob {
    id: String,
    state: Arc<Mutex<JobState>>,
}

#[async_trait]
impl RuntimeJob for FakeJob {
    fn job_id(&self) -> &str {
        &self.id
    }

    async fn status(&self) -> HalResult<String> {
        let mut state = lock(&self.state);
        let idx = state.reads.min(state.script.statuses.len().saturating_sub(1));
        state.reads += 1;
        state
            .script
            .statuses
            .get(idx)
            .cloned()
            .ok_or_else(|| HalError::Backend("no status".into()))
    }

    async fn backend_name(&self) -> Option<String> {
        lock(&self.state).script.backend_name.clone()
    }

    async fn error_message(&self) -> Option<String> {
        lock(&self.state).script.error_message.clone()
    }

    async fn result(&self) -> HalResult<SamplerResult> {
        lock(&self.state).script.result.clone()
    }

    async fn cancel(&self) -> HalResult<()> {
        let mut state = lock(&self.state);
        state.cancel_requests += 1;
        match &state.script.cancel_error {
            Some(message) => Err(HalError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

/// A recorded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: String,
    pub backend: String,
    pub shots: u32,
    pub num_qubits: u32,
}

/// An in-memory runtime service.
#[derive(Debug)]
pub struct FakeService {
    backends: Vec<FakeBackend>,
    supports_min_qubits: bool,
    supports_operational_filter: bool,
    submit_script: JobScript,
    jobs: Mutex<BTreeMap<String, Arc<Mutex<JobState>>>>,
    submissions: Mutex<Vec<Submission>>,
}

impl FakeService {
    /// A service exposing `backends`; submitted jobs follow `submit_script`.
    pub fn new(backends: Vec<FakeBackend>, submit_script: JobScript) -> Self {
        Self {
            backends,
            supports_min_qubits: true,
            supports_operational_filter: true,
            submit_script,
            jobs: Mutex::new(BTreeMap::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Reject the min-qubit filter with `Unsupported`.
    pub fn without_min_qubit_filter(mut self) -> Self {
        self.supports_min_qubits = false;
        self
    }

    /// Reject the operational filter with `Unsupported`.
    pub fn without_operational_filter(mut self) -> Self {
        self.supports_operational_filter = false;
        self
    }

    /// Register an existing job.
    pub fn with_job(self, job_id: &str, script: JobScript) -> Self {
        lock(&self.jobs).insert(job_id.to_string(), Self::state(script));
        self
    }

    /// Submissions received so far.
    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.submissions).clone()
    }

    /// Number of cancel requests a job received.
    pub fn cancel_requests(&self, job_id: &str) -> usize {
        lock(&self.jobs)
            .get(job_id)
            .map(|s| lock(s).cancel_requests)
            .unwrap_or(0)
    }

    fn state(script: JobScript) -> Arc<Mutex<JobState>> {
        Arc::new(Mutex::new(JobState {
            script,
            reads: 0,
            cancel_requests: 0,
        }))
    }

    fn matching(&self, filter: &BackendFilter) -> Vec<&FakeBackend> {
        self.backends.iter().filter(|b| filter.matches(*b)).collect()
    }
}

#[async_trait]
impl RuntimeService for FakeService {
    async fn backend(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        self.backends
            .iter()
            .find(|b| b.name == name)
            .map(|b| Arc::new(b.clone()) as Arc<dyn Backend>)
            .ok_or_else(|| HalError::BackendUnavailable(format!("No backend named '{name}'")))
    }

    async fn least_busy(&self, filter: &BackendFilter) -> HalResult<Arc<dyn Backend>> {
        if filter.min_num_qubits.is_some() && !self.supports_min_qubits {
            return Err(HalError::Unsupported("min_num_qubits".into()));
        }
        self.matching(filter)
            .into_iter()
            .min_by_key(|b| (b.pending_jobs.unwrap_or(u32::MAX), b.name.clone()))
            .map(|b| Arc::new(b.clone()) as Arc<dyn Backend>)
            .ok_or_else(|| HalError::BackendUnavailable("No backend matches the filter".into()))
    }

    async fn backends(&self, filter: &BackendFilter) -> HalResult<Vec<Arc<dyn Backend>>> {
        if filter.operational.is_some() && !self.supports_operational_filter {
            return Err(HalError::Unsupported("operational".into()));
        }
        Ok(self
            .matching(filter)
            .into_iter()
            .map(|b| Arc::new(b.clone()) as Arc<dyn Backend>)
            .collect())
    }

    async fn job(&self, job_id: &str) -> HalResult<Box<dyn RuntimeJob>> {
        let state = lock(&self.jobs)
            .get(job_id)
            .cloned()
            .ok_or_else(|| HalError::Backend(format!("job {job_id} not found")))?;
        Ok(Box::new(FakeJob {
            id: job_id.to_string(),
            state,
        }))
    }

    async fn submit(
        &self,
        backend: &dyn Backend,
        circuit: &Circuit,
        shots: u32,
    ) -> HalResult<Box<dyn RuntimeJob>> {
        let mut submissions = lock(&self.submissions);
        let job_id = format!("job-{}", submissions.len() + 1);
        let mut script = self.submit_script.clone();
        script.backend_name.get_or_insert_with(|| backend.name().to_string());

        let state = Self::state(script);
        lock(&self.jobs).insert(job_id.clone(), Arc::clone(&state));
        submissions.push(Submission {
            job_id: job_id.clone(),
            backend: backend.name().to_string(),
            shots,
            num_qubits: circuit.num_qubits(),
        });

        Ok(Box::new(FakeJob { id: job_id, state }))
    }
}

/// Connector that serves one shared [`FakeService`] on scripted channels.
pub struct FakeConnector {
    service: Arc<FakeService>,
    channels: BTreeMap<String, Result<(), ConnectError>>,
    attempts: Mutex<Vec<ChannelRequest>>,
}

impl FakeConnector {
    /// Every channel not scripted otherwise fails as unknown.
    pub fn new(service: Arc<FakeService>) -> Self {
        Self {
            service,
            channels: BTreeMap::new(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Accept `channel`.
    pub fn accepting(mut self, channel: &str) -> Self {
        self.channels.insert(channel.to_string(), Ok(()));
        self
    }

    /// Fail `channel` with `error`.
    pub fn failing(mut self, channel: &str, error: ConnectError) -> Self {
        self.channels.insert(channel.to_string(), Err(error));
        self
    }

    /// Channels attempted so far, in order.
    pub fn attempted_channels(&self) -> Vec<String> {
        lock(&self.attempts).iter().map(|r| r.channel.clone()).collect()
    }

    /// The shared service.
    pub fn service(&self) -> &Arc<FakeService> {
        &self.service
    }
}

#[async_trait]
impl ServiceConnector for FakeConnector {
    async fn connect(
        &self,
        request: &ChannelRequest,
    ) -> Result<Arc<dyn RuntimeService>, ConnectError> {
        lock(&self.attempts).push(request.clone());
        match self.channels.get(&request.channel) {
            Some(Ok(())) => Ok(Arc::clone(&self.service) as Arc<dyn RuntimeService>),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ConnectError::Failed(format!(
                "Unknown channel '{}'",
                request.channel
            ))),
        }
    }
}
