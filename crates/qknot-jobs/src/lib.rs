//! qknot Job Lifecycle
//!
//! [`JobLifecycleManager`] ties braid validation, circuit compilation, and a
//! runtime [`ServiceConnector`](qknot_hal::ServiceConnector) together:
//!
//! - [`submit`](JobLifecycleManager::submit) resolves a session, selects and
//!   checks a backend, compiles the braid circuit, and dispatches it.
//! - [`poll`](JobLifecycleManager::poll) maps the service's status onto the
//!   canonical taxonomy and formats finished results; unfinished results
//!   come back as [`PollOutcome::Partial`] instead of an error.
//! - [`cancel`](JobLifecycleManager::cancel) is fire-and-forget.
//! - [`run`](JobLifecycleManager::run) submits and waits.
//! - [`list_backends`](JobLifecycleManager::list_backends) and
//!   [`generate_circuit_artifact`](JobLifecycleManager::generate_circuit_artifact)
//!   round out the surface.

pub mod config;
pub mod error;
pub mod manager;
pub mod types;

pub use config::{JobManagerConfig, MAX_SHOTS, WaitPolicy, check_shots};
pub use error::{JobError, JobResult};
pub use manager::JobLifecycleManager;
pub use types::{
    BackendListing, CANCELLATION_DETAIL, CircuitArtifact, CompletedJob, JobSnapshot, PollOutcome,
    RuntimeTarget, SubmitRequest, SubmitResponse, UNKNOWN_BACKEND,
};
