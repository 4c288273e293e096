//! qknot Hardware Abstraction Layer
//!
//! Interfaces between the knot pipeline and a remote quantum runtime.
//!
//! # Contract
//!
//! - [`ServiceConnector`] builds a [`RuntimeService`] for one channel.
//!   [`ChannelResolver`] tries channels and classifies each attempt.
//! - [`RuntimeService`] looks up [`Backend`]s, selects the least busy one,
//!   submits circuits, and fetches [`RuntimeJob`]s.
//! - Raw job statuses normalize into [`JobStatus`] and classify into
//!   [`StatusClass`].
//! - Finished jobs yield a [`SamplerResult`]; [`ExpectationSummary`] turns
//!   ancilla counts into the reported expectation value.
//!
//! Every network call re-resolves its session; nothing here caches state.

pub mod backend;
pub mod error;
pub mod job;
pub mod resolver;
pub mod result;
pub mod selection;
pub mod service;
pub mod status;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{Backend, BackendFilter, BackendInfo};
pub use error::{HalError, HalResult};
pub use job::{RuntimeJob, resolve_error_message, resolve_status};
pub use resolver::{
    AttemptOutcome, ChannelResolver, DEFAULT_CHANNEL_CANDIDATES, RuntimeSession,
    is_channel_support_message,
};
pub use result::{Counts, ExpectationSummary, OutcomeProbability, PubResult, SamplerResult};
pub use selection::{DEFAULT_MIN_QUBITS, LEAST_BUSY, ensure_capacity, least_busy_hardware, select_backend};
pub use service::{ChannelRequest, ConnectError, RuntimeService, ServiceConnector};
pub use status::{JobStatus, StatusClass};
