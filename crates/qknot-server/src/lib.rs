//! qknot HTTP API
//!
//! Exposes braid-based knot evaluation over HTTP: Dowker ingestion, braid
//! verification, offline circuit generation, and the runtime job lifecycle
//! (submit, poll, cancel, run, backend listing).
//!
//! # Routes
//!
//! All routes live under `/api` and take JSON bodies:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /health` | [`api::health::health`] |
//! | `POST /knot/ingest` | [`api::knot::ingest`] |
//! | `POST /knot/verify` | [`api::knot::verify`] |
//! | `POST /knot/circuit/generate` | [`api::knot::generate_circuit`] |
//! | `POST /backends` | [`api::backends::list_backends`] |
//! | `POST /jobs/submit` | [`api::jobs::submit`] |
//! | `POST /jobs/poll` | [`api::jobs::poll`] |
//! | `POST /jobs/cancel` | [`api::jobs::cancel`] |
//! | `POST /run-experiment` | [`api::jobs::run_experiment`] |
//!
//! Input errors answer `422`, service failures `500`; both carry
//! `{"detail": "<message>"}`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qknot_adapter_ibm::IbmConnector;
//! use qknot_server::{AppState, ServerConfig, create_router};
//!
//! let state = Arc::new(AppState::new(ServerConfig::default(), Arc::new(IbmConnector::new())));
//! let app = create_router(state);
//! ```

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Args, MISSING_CREDENTIALS, ServerConfig};
pub use error::ApiError;
pub use server::create_router;
pub use state::AppState;
