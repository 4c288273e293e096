//! IBM backends as HAL backends.

use qknot_hal::Backend;

use crate::api::BackendDescriptor;

/// A backend snapshot taken from the IBM API.
#[derive(Debug, Clone)]
pub struct IbmBackend {
    descriptor: BackendDescriptor,
}

impl IbmBackend {
    pub fn new(descriptor: BackendDescriptor) -> Self {
        Self { descriptor }
    }

    /// The reported capabilities.
    pub fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }
}

impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn num_qubits(&self) -> Option<u32> {
        self.descriptor.num_qubits
    }

    fn pending_jobs(&self) -> Option<u32> {
        self.descriptor.pending_jobs
    }

    fn operational(&self) -> Option<bool> {
        self.descriptor.operational
    }

    fn is_simulator(&self) -> Option<bool> {
        self.descriptor.simulator
    }
}
