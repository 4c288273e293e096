//! Error types for the HAL crate.

use thiserror::Error;

/// Errors raised while talking to a quantum runtime service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HalError {
    /// An explicitly requested channel is not supported by the runtime client.
    #[error("The runtime client does not support the selected runtime channel '{channel}'.")]
    ChannelUnsupported {
        /// The requested channel.
        channel: String,
    },

    /// Session construction failed for a reason unrelated to channel support.
    #[error("Failed to initialize the runtime service: {0}")]
    ServiceInit(String),

    /// Every automatic channel candidate was rejected.
    #[error(
        "Unable to initialize the runtime service with any supported runtime channel. {}",
        .failures.join(" | ")
    )]
    NoSupportedChannel {
        /// `"<channel>: <reason>"` per candidate, in attempt order.
        failures: Vec<String>,
    },

    /// The selected backend is too small for the braid.
    #[error(
        "Selected backend '{backend}' has {available} qubits, but the braid word requires at least {required} qubits."
    )]
    InsufficientQubits {
        /// Backend name.
        backend: String,
        /// Qubits the backend reports.
        available: u32,
        /// Qubits the braid needs.
        required: u32,
    },

    /// Backend lookup or selection failed.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Listing backends failed.
    #[error("Failed to list accessible backends: {0}")]
    BackendListing(String),

    /// The service does not support a requested capability.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// A job id could not be resolved.
    #[error("Failed to retrieve runtime job '{job_id}': {reason}")]
    JobRetrieval {
        /// The requested job id.
        job_id: String,
        /// Underlying failure.
        reason: String,
    },

    /// A cancellation request failed.
    #[error("Failed to cancel runtime job '{job_id}': {reason}")]
    CancelFailed {
        /// The job id.
        job_id: String,
        /// Underlying failure.
        reason: String,
    },

    /// Job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job reached a failed terminal state.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The job result carried no data section.
    #[error("Sampler result did not include measurement data.")]
    MissingMeasurementData,

    /// No result container yielded counts.
    #[error("Unable to extract measurement counts from sampler result.")]
    CountsUnavailable,

    /// Timed out waiting for a job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HalError::ChannelUnsupported { .. } | HalError::InsufficientQubits { .. }
        )
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_supported_channel_joins_failures() {
        let err = HalError::NoSupportedChannel {
            failures: vec![
                "ibm_quantum_platform: Unknown channel".into(),
                "ibm_cloud: invalid channel".into(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Unable to initialize the runtime service with any supported runtime channel. \
             ibm_quantum_platform: Unknown channel | ibm_cloud: invalid channel"
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_capacity_error_names_shortfall() {
        let err = HalError::InsufficientQubits {
            backend: "ibm_tiny".into(),
            available: 3,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "Selected backend 'ibm_tiny' has 3 qubits, but the braid word requires at least 5 qubits."
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_job_retrieval_display() {
        let err = HalError::JobRetrieval {
            job_id: "abc".into(),
            reason: "404".into(),
        };
        assert_eq!(err.to_string(), "Failed to retrieve runtime job 'abc': 404");
    }
}
