//! qknot Adapter for IBM Quantum
//!
//! Implements the `qknot-hal` runtime traits over the IBM Quantum REST API.
//!
//! # Channels
//!
//! | Channel | API | Instance |
//! |---------|-----|----------|
//! | `ibm_quantum_platform` | IBM Cloud (`quantum.cloud.ibm.com/api`) | service CRN (required) |
//! | `ibm_cloud` | IBM Cloud (`quantum.cloud.ibm.com/api`) | service CRN (required) |
//! | `ibm_quantum` | legacy (`api.quantum-computing.ibm.com`) | hub/group/project (optional) |
//!
//! On the cloud channels the credential is an IBM Cloud API key, exchanged at
//! IAM for a bearer token when the session is built. On the legacy channel the
//! credential is used as the bearer token directly.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use qknot_adapter_ibm::IbmConnector;
//! use qknot_hal::ChannelResolver;
//!
//! let connector = IbmConnector::new();
//! let session = ChannelResolver::default()
//!     .resolve(&connector, &api_key, None, Some(&service_crn))
//!     .await?;
//! println!("connected via {}", session.channel_used);
//! ```
//!
//! Circuits are dispatched as OpenQASM 3 to the sampler primitive (V2 PUB
//! format); V2 hex samples are decoded into bitstring counts per classical
//! register.

pub mod api;
mod backend;
mod connector;
mod decode;
mod error;
mod job;
mod service;

pub use backend::IbmBackend;
pub use connector::{CLOUD_CHANNELS, IbmConnector, LEGACY_CHANNEL};
pub use decode::decode_results;
pub use error::{IbmError, IbmResult};
pub use job::IbmJob;
pub use service::IbmService;
