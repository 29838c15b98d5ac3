//! Gateway server

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use controlplane_common::Error;
use controlplane_orchestrator::Orchestrator;

use crate::handlers::{
    create_workspace_handler, health_handler, list_pods_handler, submit_job_handler,
};

/// Shared state for handlers
#[derive(Clone)]
pub struct AppState {
    /// The orchestration layer every route delegates to
    pub orchestrator: Orchestrator,
    /// Namespace used when a request omits `?namespace=`
    pub default_namespace: String,
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_handler))
        .route("/api/v1/pods", get(list_pods_handler))
        .route("/api/v1/workspaces", post(create_workspace_handler))
        .route("/api/v1/jobs/spark", post(submit_job_handler))
        .with_state(state)
}

/// Serve the gateway on `addr` until Ctrl-C or SIGTERM
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<(), Error> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("failed to bind {}: {}", addr, e)))?;

    info!(addr = %addr, "starting gateway");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::internal_with_context("server", e.to_string()))?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
