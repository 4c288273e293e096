//! Backend capability interface.

use std::fmt;
use std::sync::Arc;

use qknot_circuit::Transpiler;
use serde::{Deserialize, Serialize};

/// An execution target exposed by a runtime service.
///
/// Only the name is required; every other capability is optional and
/// defaults to "not reported".
pub trait Backend: Send + Sync + fmt::Debug {
    /// Backend name.
    fn name(&self) -> &str;

    /// Qubits available on the device.
    fn num_qubits(&self) -> Option<u32> {
        None
    }

    /// Jobs currently queued ahead of a new submission.
    fn pending_jobs(&self) -> Option<u32> {
        None
    }

    /// Whether the backend currently accepts jobs.
    fn operational(&self) -> Option<bool> {
        None
    }

    /// Whether the backend is a simulator.
    fn is_simulator(&self) -> Option<bool> {
        None
    }

    /// Target-aware transpiler, if the backend ships one.
    fn transpiler(&self) -> Option<Arc<dyn Transpiler>> {
        None
    }
}

/// Filter for listing and least-busy selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendFilter {
    /// Require this operational state.
    pub operational: Option<bool>,
    /// Require this simulator flag.
    pub simulator: Option<bool>,
    /// Require at least this many qubits.
    pub min_num_qubits: Option<u32>,
}

impl BackendFilter {
    /// Operational hardware only.
    pub fn operational_hardware() -> Self {
        Self {
            operational: Some(true),
            simulator: Some(false),
            min_num_qubits: None,
        }
    }

    /// Add a minimum qubit count.
    pub fn with_min_qubits(mut self, min: u32) -> Self {
        self.min_num_qubits = Some(min);
        self
    }

    /// Whether `backend` passes the filter. Unreported capabilities fail a
    /// filter that constrains them.
    pub fn matches(&self, backend: &dyn Backend) -> bool {
        let operational_ok = self
            .operational
            .is_none_or(|want| backend.operational() == Some(want));
        let simulator_ok = self
            .simulator
            .is_none_or(|want| backend.is_simulator() == Some(want));
        let qubits_ok = self
            .min_num_qubits
            .is_none_or(|min| backend.num_qubits().is_some_and(|n| n >= min));
        operational_ok && simulator_ok && qubits_ok
    }
}

/// Serializable snapshot of a backend for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub num_qubits: Option<u32>,
    pub pending_jobs: Option<u32>,
    pub operational: Option<bool>,
}

impl BackendInfo {
    /// Snapshot a backend.
    pub fn from_backend(backend: &dyn Backend) -> Self {
        Self {
            name: backend.name().to_string(),
            num_qubits: backend.num_qubits(),
            pending_jobs: backend.pending_jobs(),
            operational: backend.operational(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Device {
        qubits: Option<u32>,
        simulator: bool,
    }

    impl Backend for Device {
        fn name(&self) -> &str {
            "device"
        }
        fn num_qubits(&self) -> Option<u32> {
            self.qubits
        }
        fn operational(&self) -> Option<bool> {
            Some(true)
        }
        fn is_simulator(&self) -> Option<bool> {
            Some(self.simulator)
        }
    }

    #[test]
    fn test_filter_matches() {
        let filter = BackendFilter::operational_hardware().with_min_qubits(3);
        assert!(filter.matches(&Device { qubits: Some(5), simulator: false }));
        assert!(!filter.matches(&Device { qubits: Some(2), simulator: false }));
        assert!(!filter.matches(&Device { qubits: None, simulator: false }));
        assert!(!filter.matches(&Device { qubits: Some(5), simulator: true }));
        assert!(BackendFilter::default().matches(&Device { qubits: None, simulator: true }));
    }

    #[test]
    fn test_info_snapshot() {
        let info = BackendInfo::from_backend(&Device { qubits: Some(7), simulator: false });
        assert_eq!(info.name, "device");
        assert_eq!(info.num_qubits, Some(7));
        assert_eq!(info.pending_jobs, None);
    }
}
