//! Process configuration
//!
//! Every setting can come from a flag or an environment variable. The
//! resolution order is flag, then environment, then the default below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::kube_utils::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
use crate::{Error, DEFAULT_NAMESPACE};

/// Runtime settings for the gateway and its cluster clients
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Address the HTTP gateway listens on
    #[arg(long, env = "CONTROLPLANE_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Path to a kubeconfig; inferred from the environment when omitted
    #[arg(long, env = "KUBECONFIG_PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace used when a request does not name one
    #[arg(long, env = "CONTROLPLANE_DEFAULT_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub default_namespace: String,

    /// Connect timeout for the API server, in seconds
    #[arg(
        long,
        env = "CONTROLPLANE_CONNECT_TIMEOUT_SECS",
        default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs()
    )]
    pub connect_timeout_secs: u64,

    /// Read timeout for the API server, in seconds
    #[arg(
        long,
        env = "CONTROLPLANE_READ_TIMEOUT_SECS",
        default_value_t = DEFAULT_READ_TIMEOUT.as_secs()
    )]
    pub read_timeout_secs: u64,

    /// Deadline for a whole orchestrator operation, in seconds
    #[arg(long, env = "CONTROLPLANE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Emit human-readable logs instead of JSON
    #[arg(long, env = "CONTROLPLANE_PLAIN_LOGS")]
    pub plain_logs: bool,
}

impl Settings {
    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<(), Error> {
        if self.default_namespace.trim().is_empty() {
            return Err(Error::config("default namespace must not be empty"));
        }
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err(Error::config("client timeouts must be at least one second"));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(Error::config("request timeout must be at least one second"));
        }
        Ok(())
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout as a duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Per-operation deadline, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
