//! Error types for the control plane
//!
//! Every orchestrator failure is classified into one of four kinds so the
//! gateway can map it without inspecting kube internals:
//! - `Validation`: the request was rejected before any cluster call
//! - `Conflict`: the named resource already exists
//! - `Transport`: the API server could not be reached or refused our credentials
//! - `Orchestrator`: any other rejection from the API server (admission, schema, missing CRD)
//!
//! Each cluster-facing variant carries the operation that produced it.

use std::time::Duration;

use thiserror::Error;

/// Main error type for control plane operations
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed local validation
    #[error("validation error on {field}: {message}")]
    Validation {
        /// The offending field path (e.g., "driver.memory")
        field: String,
        /// Description of what's invalid
        message: String,
    },

    /// The API server reported that the named resource already exists
    #[error("{operation}: '{name}' already exists: {message}")]
    Conflict {
        /// Operation that produced the error
        operation: String,
        /// Name of the conflicting resource
        name: String,
        /// Message returned by the API server
        message: String,
    },

    /// Network, TLS, authentication or deadline failure reaching the API server
    #[error("{operation}: transport error: {message}")]
    Transport {
        /// Operation that produced the error
        operation: String,
        /// Description of what failed
        message: String,
    },

    /// Any other rejection from the API server
    #[error("{operation}: api server rejected request ({code} {reason}): {message}")]
    Orchestrator {
        /// Operation that produced the error
        operation: String,
        /// HTTP status code returned by the API server
        code: u16,
        /// Machine-readable reason (e.g., "Invalid", "Forbidden")
        reason: String,
        /// Message returned by the API server
        message: String,
    },

    /// Invalid process configuration
    #[error("configuration error: {message}")]
    Config {
        /// Description of what's misconfigured
        message: String,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g., "submit_job", "telemetry")
        context: String,
    },
}

impl Error {
    /// Create a validation error for a field
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an internal error with context
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Create a transport error for an operation whose deadline expired
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: format!("deadline of {}s exceeded", after.as_secs_f64()),
        }
    }

    /// Create a transport error for a kube client that could not be built (TLS, proxy, auth plugin)
    pub fn client_build(msg: impl Into<String>) -> Self {
        Self::Transport {
            operation: "create_client".to_string(),
            message: msg.into(),
        }
    }

    /// Classify a kube client error produced while `operation` acted on `name`.
    ///
    /// 409 becomes `Conflict`, 401/403 become `Transport` (credential failures
    /// are indistinguishable from connectivity problems to the caller), any
    /// other API status becomes `Orchestrator`. Errors that never produced an
    /// API status are `Transport`.
    pub fn from_kube(operation: impl Into<String>, name: impl Into<String>, err: kube::Error) -> Self {
        let operation = operation.into();
        match err {
            kube::Error::Api(ae) if ae.code == 409 => Self::Conflict {
                operation,
                name: name.into(),
                message: ae.message,
            },
            kube::Error::Api(ae) if ae.code == 401 || ae.code == 403 => Self::Transport {
                operation,
                message: format!("{} ({})", ae.message, ae.reason),
            },
            kube::Error::Api(ae) => Self::Orchestrator {
                operation,
                code: ae.code,
                reason: ae.reason,
                message: ae.message,
            },
            other => Self::Transport {
                operation,
                message: other.to_string(),
            },
        }
    }

    /// Whether the error is a name conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether the error was raised before any cluster call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether the error came from reaching the API server rather than its verdict
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The operation tag carried by cluster-facing errors
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Conflict { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Orchestrator { operation, .. } => Some(operation),
            Self::Internal { context, .. } => Some(context),
            Self::Validation { .. } | Self::Config { .. } => None,
        }
    }
}
