//! Runtime service and connector interfaces.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qknot_circuit::Circuit;
use thiserror::Error;

use crate::backend::{Backend, BackendFilter};
use crate::error::HalResult;
use crate::job::RuntimeJob;

/// An authenticated session with a quantum runtime service.
#[async_trait]
pub trait RuntimeService: Send + Sync {
    /// Look up a backend by name.
    async fn backend(&self, name: &str) -> HalResult<Arc<dyn Backend>>;

    /// The matching backend with the fewest pending jobs.
    ///
    /// Returns [`HalError::Unsupported`](crate::HalError::Unsupported) when
    /// the service cannot apply part of the filter, so callers can retry with
    /// a looser one.
    async fn least_busy(&self, filter: &BackendFilter) -> HalResult<Arc<dyn Backend>>;

    /// Backends matching the filter. Same `Unsupported` contract as
    /// [`least_busy`](Self::least_busy).
    async fn backends(&self, filter: &BackendFilter) -> HalResult<Vec<Arc<dyn Backend>>>;

    /// Fetch an existing job.
    async fn job(&self, job_id: &str) -> HalResult<Box<dyn RuntimeJob>>;

    /// Dispatch a transpiled circuit for sampling.
    async fn submit(
        &self,
        backend: &dyn Backend,
        circuit: &Circuit,
        shots: u32,
    ) -> HalResult<Box<dyn RuntimeJob>>;
}

/// Parameters for one session construction attempt.
#[derive(Clone)]
pub struct ChannelRequest {
    /// Channel name to connect through.
    pub channel: String,
    /// Credential; never logged.
    pub token: String,
    /// Optional instance (CRN or hub/group/project).
    pub instance: Option<String>,
}

impl fmt::Debug for ChannelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRequest")
            .field("channel", &self.channel)
            .field("token", &"[REDACTED]")
            .field("instance", &self.instance)
            .finish()
    }
}

/// Why a connector could not build a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The client has no notion of the requested channel at all.
    #[error("{0}")]
    ChannelNotSupported(String),

    /// Any other construction failure.
    #[error("{0}")]
    Failed(String),
}

/// Builds runtime sessions. Implemented by adapters around a concrete client.
#[async_trait]
pub trait ServiceConnector: Send + Sync {
    /// Attempt to construct a session for one channel.
    async fn connect(
        &self,
        request: &ChannelRequest,
    ) -> Result<Arc<dyn RuntimeService>, ConnectError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_request_debug_redacts_token() {
        let request = ChannelRequest {
            channel: "ibm_cloud".into(),
            token: "super-secret".into(),
            instance: None,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
