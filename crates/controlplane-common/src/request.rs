//! Domain requests accepted by the orchestrator
//!
//! These are decoded from gateway JSON and validated before any cluster call.
//! Wire names follow the Spark operator's vocabulary (`sparkVersion`,
//! `mainApplicationFile`) so clients can reuse their SparkApplication fields.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Maximum length of a DNS-1123 label
const MAX_LABEL_LEN: usize = 63;

/// Request to provision a workspace (a namespace)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRequest {
    /// Namespace name; must be a DNS label
    pub name: String,
}

impl WorkspaceRequest {
    /// Check the request before it reaches a cluster client
    pub fn validate(&self) -> Result<(), Error> {
        validate_dns_label("name", &self.name)
    }
}

/// Where the Spark driver runs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Driver runs in a pod inside the cluster
    Cluster,
    /// Driver runs in the submitting process
    Client,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Cluster => write!(f, "cluster"),
            ExecutionMode::Client => write!(f, "client"),
        }
    }
}

/// Request to submit a distributed Python job
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Job name, reused as the SparkApplication name
    pub name: String,
    /// Driver placement
    #[serde(rename = "mode")]
    pub execution_mode: ExecutionMode,
    /// Container image for driver and executors
    #[serde(rename = "image")]
    pub container_image: String,
    /// Spark runtime version (e.g. "3.5.1")
    #[serde(rename = "sparkVersion")]
    pub runtime_version: String,
    /// Entry point URI (e.g. "local:///opt/app/main.py")
    #[serde(rename = "mainApplicationFile")]
    pub entry_point_path: String,
    /// Arguments passed to the entry point, in order; absent and `null` both mean none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: Vec<String>,
    /// Driver resources
    pub driver: DriverSpec,
    /// Executor resources
    pub executor: ExecutorSpec,
}

/// Driver pod resources
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriverSpec {
    /// JVM memory quantity (e.g. "2g")
    pub memory: String,
    /// CPU cores
    #[serde(rename = "cores")]
    pub cpu_cores: i32,
    /// Service account the driver uses to create executors
    pub service_account: String,
}

/// Executor pod resources
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorSpec {
    /// JVM memory quantity (e.g. "4g")
    pub memory: String,
    /// CPU cores per executor
    #[serde(rename = "cores")]
    pub cpu_cores: i32,
    /// Number of executors
    #[serde(rename = "instances")]
    pub instance_count: i32,
}

impl JobRequest {
    /// Check the request before it reaches a cluster client.
    ///
    /// Returns the first violation found, in field order.
    pub fn validate(&self) -> Result<(), Error> {
        validate_dns_label("name", &self.name)?;
        require_non_empty("image", &self.container_image)?;
        require_non_empty("sparkVersion", &self.runtime_version)?;
        require_non_empty("mainApplicationFile", &self.entry_point_path)?;
        self.driver.validate()?;
        self.executor.validate()
    }
}

impl DriverSpec {
    fn validate(&self) -> Result<(), Error> {
        validate_memory("driver.memory", &self.memory)?;
        require_positive("driver.cores", self.cpu_cores)?;
        require_non_empty("driver.serviceAccount", &self.service_account)
    }
}

impl ExecutorSpec {
    fn validate(&self) -> Result<(), Error> {
        validate_memory("executor.memory", &self.memory)?;
        require_positive("executor.cores", self.cpu_cores)?;
        require_positive("executor.instances", self.instance_count)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_positive(field: &str, value: i32) -> Result<(), Error> {
    if value < 1 {
        return Err(Error::validation(
            field,
            format!("must be at least 1, got {}", value),
        ));
    }
    Ok(())
}

/// Validate a DNS-1123 label: lowercase alphanumerics and '-', alphanumeric at both ends
pub fn validate_dns_label(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(Error::validation(
            field,
            format!("must be at most {} characters", MAX_LABEL_LEN),
        ));
    }
    let valid_chars = value
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid_chars {
        return Err(Error::validation(
            field,
            format!("'{}' may only contain lowercase letters, digits and '-'", value),
        ));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(Error::validation(
            field,
            format!("'{}' must start and end with a letter or digit", value),
        ));
    }
    Ok(())
}

/// Validate a JVM-style memory quantity: digits with an optional k/m/g/t/p unit and optional 'b'
pub fn validate_memory(field: &str, value: &str) -> Result<(), Error> {
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(digits_end);

    let unit_ok = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => true,
        u => {
            let u = u.strip_suffix('b').unwrap_or(u);
            matches!(u, "k" | "m" | "g" | "t" | "p")
        }
    };

    if number.is_empty() || !unit_ok || number.bytes().all(|b| b == b'0') {
        return Err(Error::validation(
            field,
            format!("'{}' is not a memory quantity like \"512m\" or \"2g\"", value),
        ));
    }
    Ok(())
}
