//! Backend selection and capacity checks.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{Backend, BackendFilter};
use crate::error::{HalError, HalResult};
use crate::service::RuntimeService;

/// Backend name that requests automatic least-busy selection.
pub const LEAST_BUSY: &str = "least_busy";

/// Default minimum qubit count for least-busy selection.
pub const DEFAULT_MIN_QUBITS: u32 = 3;

/// Least-busy operational hardware with at least `min_qubits` qubits.
///
/// Retries without the qubit filter when the service does not support it.
pub async fn least_busy_hardware(
    service: &dyn RuntimeService,
    min_qubits: u32,
) -> HalResult<Arc<dyn Backend>> {
    let filter = BackendFilter::operational_hardware();
    match service.least_busy(&filter.with_min_qubits(min_qubits)).await {
        Err(HalError::Unsupported(reason)) => {
            debug!(%reason, "least_busy rejected min qubit filter; retrying without it");
            service.least_busy(&filter).await
        }
        other => other,
    }
}

/// Resolve the backend for a submission.
///
/// [`LEAST_BUSY`] selects automatically. A named backend is looked up
/// directly; any lookup failure falls back to automatic selection.
pub async fn select_backend(
    service: &dyn RuntimeService,
    backend_name: &str,
    min_qubits: u32,
) -> HalResult<Arc<dyn Backend>> {
    if backend_name == LEAST_BUSY {
        return least_busy_hardware(service, min_qubits).await;
    }

    match service.backend(backend_name).await {
        Ok(backend) => Ok(backend),
        Err(e) => {
            warn!(backend = %backend_name, error = %e, "backend lookup failed; using least busy");
            least_busy_hardware(service, min_qubits).await
        }
    }
}

/// Fail when the backend reports fewer qubits than required.
pub fn ensure_capacity(backend: &dyn Backend, required_qubits: u32) -> HalResult<()> {
    match backend.num_qubits() {
        Some(available) if available < required_qubits => Err(HalError::InsufficientQubits {
            backend: backend.name().to_string(),
            available,
            required: required_qubits,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, FakeService, JobScript};

    fn service() -> FakeService {
        FakeService::new(
            vec![
                FakeBackend::hardware("ibm_busy", 127, 40),
                FakeBackend::hardware("ibm_small", 2, 0),
                FakeBackend::hardware("ibm_quiet", 27, 3),
                FakeBackend::simulator("simulator_mps", 100),
            ],
            JobScript::completing(&["DONE"], 1, 0),
        )
    }

    #[derive(Debug)]
    struct Device(Option<u32>);

    impl Backend for Device {
        fn name(&self) -> &str {
            "sized"
        }
        fn num_qubits(&self) -> Option<u32> {
            self.0
        }
    }

    #[test]
    fn test_ensure_capacity() {
        assert!(ensure_capacity(&Device(Some(5)), 5).is_ok());
        assert!(ensure_capacity(&Device(None), 50).is_ok());
        assert_eq!(
            ensure_capacity(&Device(Some(3)), 5),
            Err(HalError::InsufficientQubits {
                backend: "sized".into(),
                available: 3,
                required: 5,
            })
        );
    }

    #[tokio::test]
    async fn test_least_busy_respects_min_qubits() {
        let backend = select_backend(&service(), LEAST_BUSY, 3).await.unwrap();
        assert_eq!(backend.name(), "ibm_quiet");
    }

    #[tokio::test]
    async fn test_least_busy_falls_back_without_min_qubit_support() {
        let service = service().without_min_qubit_filter();
        let backend = select_backend(&service, LEAST_BUSY, 3).await.unwrap();
        assert_eq!(backend.name(), "ibm_small");
    }

    #[tokio::test]
    async fn test_named_lookup_and_fallback() {
        let backend = select_backend(&service(), "ibm_busy", 3).await.unwrap();
        assert_eq!(backend.name(), "ibm_busy");

        let backend = select_backend(&service(), "ibm_missing", 3).await.unwrap();
        assert_eq!(backend.name(), "ibm_quiet");
    }
}
