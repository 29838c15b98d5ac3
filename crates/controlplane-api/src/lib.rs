//! Control plane HTTP gateway
//!
//! Decodes JSON requests, calls one orchestrator operation, and maps the
//! result to a status code. No cluster logic lives here.
//!
//! # Endpoints
//!
//! - `GET /healthcheck` - Liveness
//! - `GET /api/v1/pods?namespace=` - Pod names in a namespace
//! - `POST /api/v1/workspaces` - Create a workspace namespace
//! - `POST /api/v1/jobs/spark?namespace=` - Submit a Spark job

#![deny(missing_docs)]

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, start_server, AppState};
