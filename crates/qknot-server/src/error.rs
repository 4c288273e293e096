//! Error types for the HTTP API.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use qknot_braid::BraidError;
use qknot_circuit::CircuitError;
use qknot_jobs::JobError;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The caller can fix this by changing the request.
    #[error("{0}")]
    Input(String),

    /// Service or server failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Whether this error maps to a client-fault status.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ApiError::Input(_))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, detail = %self, "request failed");
        } else {
            tracing::debug!(%status, detail = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

fn classify(input: bool, message: String) -> ApiError {
    if input {
        ApiError::Input(message)
    } else {
        ApiError::Internal(message)
    }
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        classify(e.is_input_error(), e.to_string())
    }
}

impl From<BraidError> for ApiError {
    fn from(e: BraidError) -> Self {
        classify(e.is_input_error(), e.to_string())
    }
}

impl From<CircuitError> for ApiError {
    fn from(e: CircuitError) -> Self {
        classify(e.is_input_error(), e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Input(rejection.body_text())
    }
}
