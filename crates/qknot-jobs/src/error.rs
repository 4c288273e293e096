//! Error types for the job lifecycle crate.

use qknot_braid::BraidError;
use qknot_circuit::CircuitError;
use qknot_hal::HalError;
use thiserror::Error;

/// Errors raised by [`JobLifecycleManager`](crate::JobLifecycleManager).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum JobError {
    /// Braid notation failed parsing or validation.
    #[error(transparent)]
    Braid(#[from] BraidError),

    /// Circuit planning or compilation failed.
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// The runtime service failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// Shot count outside the accepted range.
    #[error("Shots must be between 1 and {max}.")]
    InvalidShots {
        /// Requested shots.
        shots: i64,
        /// Upper bound.
        max: u32,
    },

    /// A required string field was blank.
    #[error("{field} cannot be empty.")]
    EmptyField {
        /// Human-readable field name.
        field: &'static str,
    },
}

impl JobError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_input_error(&self) -> bool {
        match self {
            JobError::Braid(e) => e.is_input_error(),
            JobError::Circuit(e) => e.is_input_error(),
            JobError::Hal(e) => e.is_input_error(),
            JobError::InvalidShots { .. } | JobError::EmptyField { .. } => true,
        }
    }
}

/// Result type for job lifecycle operations.
pub type JobResult<T> = Result<T, JobError>;
