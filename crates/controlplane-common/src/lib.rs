//! Common types for the control plane: errors, kube client setup, telemetry
//! and runtime configuration.

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod kube_utils;
pub mod request;
pub mod telemetry;

pub use config::Settings;
pub use error::Error;
pub use request::{DriverSpec, ExecutionMode, ExecutorSpec, JobRequest, WorkspaceRequest};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace used when a caller does not name one
pub const DEFAULT_NAMESPACE: &str = "default";
