//! Control plane gateway - HTTP front door for workspace and Spark job requests

use std::sync::Arc;

use clap::Parser;

use controlplane_api::{start_server, AppState};
use controlplane_common::kube_utils::create_client_with_timeout;
use controlplane_common::telemetry::{init_telemetry, TelemetryConfig};
use controlplane_common::Settings;
use controlplane_orchestrator::{KubeBackend, Orchestrator};

/// Translate workload requests into Kubernetes resources
#[derive(Parser, Debug)]
#[command(name = "controlplane", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings;

    init_telemetry(TelemetryConfig {
        service_name: "controlplane".to_string(),
        json: !settings.plain_logs,
    })?;

    settings.validate()?;

    let client = create_client_with_timeout(
        settings.kubeconfig.as_deref(),
        settings.connect_timeout(),
        settings.read_timeout(),
    )
    .await?;

    let orchestrator = Orchestrator::new(Arc::new(KubeBackend::new(client)))
        .with_request_timeout(settings.request_timeout());

    tracing::info!(
        default_namespace = %settings.default_namespace,
        request_timeout = ?settings.request_timeout(),
        "orchestrator ready"
    );

    let state = AppState {
        orchestrator,
        default_namespace: settings.default_namespace.clone(),
    };

    start_server(settings.listen_addr, state).await?;
    Ok(())
}
