//! Gateway error type and its HTTP mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use controlplane_common::Error;

/// Error type for gateway handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body could not be decoded into the expected request
    #[error("invalid request body: {0}")]
    Body(String),

    /// The orchestrator rejected or failed the operation
    #[error(transparent)]
    Orchestration(#[from] Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Orchestration(Error::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Orchestration(Error::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Orchestration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Body(details) => serde_json::json!({
                "error": "invalid request body",
                "details": details,
            }),
            ApiError::Orchestration(e @ Error::Validation { .. }) => serde_json::json!({
                "error": "invalid request",
                "details": e.to_string(),
            }),
            ApiError::Orchestration(Error::Conflict { name, .. }) => serde_json::json!({
                "error": "resource already exists",
                "details": format!("'{}' already exists", name),
            }),
            // Server-side failures are logged with full context, not echoed
            ApiError::Orchestration(e) => {
                error!(error = %e, "request failed");
                let summary = e
                    .operation()
                    .map(|op| format!("failed to {}", op.replace('_', " ")))
                    .unwrap_or_else(|| "internal error".to_string());
                serde_json::json!({ "error": summary })
            }
        };

        (status, Json(body)).into_response()
    }
}
