//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use donation_core::{IssueError, ProviderError, ValidationError, WorkflowStep};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Donation input rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Bad request - body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// HTTP method not supported on this route.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Billing provider failed during issuance.
    #[error("provider error at {step}: {source}")]
    Provider {
        /// Failing workflow step.
        step: WorkflowStep,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
                None,
            ),
            Self::Provider { step, source } => {
                tracing::error!(
                    step = %step,
                    error = %source.message,
                    code = ?source.code,
                    "Stripe error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create invoice".to_string(),
                    Some(source.message),
                )
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::Validation(err) => Self::Validation(err),
            IssueError::Provider { step, source } => Self::Provider { step, source },
        }
    }
}
