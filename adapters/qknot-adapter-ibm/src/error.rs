//! Error types for the IBM Quantum adapter.

use qknot_hal::HalError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors raised by the IBM Quantum REST client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IbmError {
    /// The token cannot be used as a bearer header.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// IAM token exchange failed.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// A cloud channel was requested without a service CRN.
    #[error("Runtime channel '{0}' is not supported without an instance CRN")]
    MissingServiceCrn(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    Api {
        /// HTTP status code.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Backend not found.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IbmError {
    /// Whether the API rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            IbmError::InvalidToken | IbmError::IamTokenExchange(_) => true,
            IbmError::Api { status, .. } => matches!(status, Some(401 | 403)),
            _ => false,
        }
    }
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        if e.is_auth_failure() {
            return HalError::AuthenticationFailed(e.to_string());
        }
        match e {
            IbmError::BackendUnavailable(name) => HalError::BackendUnavailable(name),
            IbmError::Http(inner) if inner.is_timeout() || inner.is_connect() => {
                HalError::Network(inner.to_string())
            }
            other => HalError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_crn_message_is_channel_support_failure() {
        let err = IbmError::MissingServiceCrn("ibm_cloud".into());
        assert!(qknot_hal::is_channel_support_message(&err.to_string()));
    }

    #[test]
    fn test_api_error_display() {
        let err = IbmError::Api {
            status: Some(500),
            message: "Something went wrong".into(),
        };
        assert!(err.to_string().contains("Something went wrong"));
    }

    #[test]
    fn test_auth_errors_map_to_authentication_failed() {
        for err in [
            IbmError::InvalidToken,
            IbmError::IamTokenExchange("401".into()),
            IbmError::Api {
                status: Some(401),
                message: "Unauthorized".into(),
            },
        ] {
            let hal: HalError = err.into();
            assert!(matches!(hal, HalError::AuthenticationFailed(_)));
        }
    }

    #[test]
    fn test_backend_unavailable_to_hal() {
        let hal: HalError = IbmError::BackendUnavailable("ibm_kyoto".into()).into();
        assert_eq!(hal, HalError::BackendUnavailable("ibm_kyoto".into()));
    }

    #[test]
    fn test_other_errors_to_hal_backend() {
        let hal: HalError = IbmError::JobNotFound("j1".into()).into();
        assert!(matches!(hal, HalError::Backend(msg) if msg.contains("j1")));

        let hal: HalError = IbmError::Api {
            status: Some(500),
            message: "server error".into(),
        }
        .into();
        assert!(matches!(hal, HalError::Backend(_)));
    }
}
