//! IBM runtime service.

use std::sync::Arc;

use async_trait::async_trait;
use qknot_circuit::{Circuit, emit_qasm3};
use qknot_hal::{
    Backend, BackendFilter, HalError, HalResult, RuntimeJob, RuntimeService,
};
use tracing::{debug, info};

use crate::api::{BackendDescriptor, IbmClient};
use crate::backend::IbmBackend;
use crate::job::IbmJob;

/// Runtime service over one authenticated [`IbmClient`].
#[derive(Debug, Clone)]
pub struct IbmService {
    client: Arc<IbmClient>,
}

impl IbmService {
    pub fn new(client: IbmClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &IbmClient {
        &self.client
    }

    async fn matching(&self, filter: &BackendFilter) -> HalResult<Vec<IbmBackend>> {
        let backends = self.client.list_backends().await?;
        Ok(backends
            .into_iter()
            .map(IbmBackend::new)
            .filter(|b| filter.matches(b))
            .collect())
    }
}

/// Least busy by reported queue; unreported queues sort last, ties by name.
fn least_busy(candidates: Vec<IbmBackend>) -> Option<IbmBackend> {
    candidates.into_iter().min_by(|a, b| {
        let key = |d: &BackendDescriptor| (d.pending_jobs.unwrap_or(u32::MAX), d.name.clone());
        key(a.descriptor()).cmp(&key(b.descriptor()))
    })
}

#[async_trait]
impl RuntimeService for IbmService {
    async fn backend(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        let descriptor = self.client.get_backend(name).await?;
        Ok(Arc::new(IbmBackend::new(descriptor)))
    }

    async fn least_busy(&self, filter: &BackendFilter) -> HalResult<Arc<dyn Backend>> {
        let candidates = self.matching(filter).await?;
        debug!(candidates = candidates.len(), "selecting least busy backend");
        least_busy(candidates)
            .map(|b| Arc::new(b) as Arc<dyn Backend>)
            .ok_or_else(|| {
                HalError::BackendUnavailable("No accessible backend matches the filter".into())
            })
    }

    async fn backends(&self, filter: &BackendFilter) -> HalResult<Vec<Arc<dyn Backend>>> {
        Ok(self
            .matching(filter)
            .await?
            .into_iter()
            .map(|b| Arc::new(b) as Arc<dyn Backend>)
            .collect())
    }

    async fn job(&self, job_id: &str) -> HalResult<Box<dyn RuntimeJob>> {
        let status = self.client.job_status(job_id).await?;
        Ok(Box::new(IbmJob::new(
            Arc::clone(&self.client),
            status.id,
            status.backend,
        )))
    }

    async fn submit(
        &self,
        backend: &dyn Backend,
        circuit: &Circuit,
        shots: u32,
    ) -> HalResult<Box<dyn RuntimeJob>> {
        let qasm = emit_qasm3(circuit);
        let response = self
            .client
            .submit_sampler(backend.name(), qasm, shots)
            .await
            .map_err(|e| match HalError::from(e) {
                auth @ HalError::AuthenticationFailed(_) => auth,
                other => HalError::SubmissionFailed(other.to_string()),
            })?;

        info!(job_id = %response.id, backend = %backend.name(), shots, "submitted sampler job");
        Ok(Box::new(IbmJob::new(
            Arc::clone(&self.client),
            response.id,
            Some(backend.name().to_string()),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(name: &str, pending: Option<u32>) -> IbmBackend {
        IbmBackend::new(BackendDescriptor {
            name: name.into(),
            num_qubits: Some(127),
            pending_jobs: pending,
            operational: Some(true),
            simulator: Some(false),
        })
    }

    #[test]
    fn test_least_busy_orders_by_queue_then_name() {
        let picked = least_busy(vec![
            backend("ibm_unknown", None),
            backend("ibm_kyiv", Some(3)),
            backend("ibm_brisbane", Some(3)),
            backend("ibm_sherbrooke", Some(9)),
        ]);
        assert_eq!(picked.map(|b| b.descriptor().name.clone()).as_deref(), Some("ibm_brisbane"));
        assert!(least_busy(Vec::new()).is_none());
    }
}
