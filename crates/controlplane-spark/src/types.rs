//! SparkApplication serialization types
//!
//! Typed representation of the Spark operator's `sparkoperator.k8s.io/v1beta2`
//! SparkApplication. Only the fields we set are modeled; the API server's
//! CRD schema remains the authority on everything else.

use serde::{Deserialize, Serialize};

/// Spark operator SparkApplication resource
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SparkApplication {
    pub api_version: String,
    pub kind: String,
    pub metadata: SparkMetadata,
    pub spec: SparkApplicationSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SparkMetadata {
    pub name: String,
    pub namespace: String,
}

/// SparkApplication spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SparkApplicationSpec {
    /// Application language ("Python")
    #[serde(rename = "type")]
    pub app_type: String,
    pub python_version: String,
    /// "cluster" or "client"
    pub mode: String,
    pub image: String,
    pub spark_version: String,
    pub main_application_file: String,
    pub arguments: Vec<String>,
    pub restart_policy: RestartPolicy,
    pub driver: DriverResources,
    pub executor: ExecutorResources,
}

/// Restart behavior applied by the Spark operator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RestartPolicy {
    #[serde(rename = "type")]
    pub policy_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverResources {
    pub memory: String,
    pub cores: i32,
    pub service_account: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorResources {
    pub memory: String,
    pub cores: i32,
    pub instances: i32,
}
