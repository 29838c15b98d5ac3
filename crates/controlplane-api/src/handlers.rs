//! Request handlers
//!
//! Each handler decodes its input, picks the namespace, and delegates to a
//! single orchestrator call.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use controlplane_common::{JobRequest, WorkspaceRequest};

use crate::error::ApiError;
use crate::server::AppState;

/// Optional `?namespace=` selector
#[derive(Debug, Default, Deserialize)]
pub struct NamespaceQuery {
    /// Target namespace; the configured default when absent or blank
    pub namespace: Option<String>,
}

impl NamespaceQuery {
    fn resolve<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(state.default_namespace.as_str())
    }
}

/// `GET /healthcheck`
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/v1/pods`
pub async fn list_pods_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let namespace = query.resolve(&state);
    debug!(namespace = %namespace, "list pods request");

    let pods = state.orchestrator.list_pods(namespace).await?;
    Ok(Json(pods))
}

/// `POST /api/v1/workspaces`
pub async fn create_workspace_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkspaceRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    debug!(workspace = %request.name, "create workspace request");

    state.orchestrator.create_workspace(&request).await?;
    Ok(StatusCode::CREATED)
}

/// `POST /api/v1/jobs/spark`
pub async fn submit_job_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(request) = payload?;
    let namespace = query.resolve(&state);
    debug!(job = %request.name, namespace = %namespace, "submit job request");

    state.orchestrator.submit_job(namespace, &request).await?;

    let message = format!("spark job '{}' created successfully", request.name);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": message })),
    ))
}
