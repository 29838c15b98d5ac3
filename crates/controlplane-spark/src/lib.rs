//! SparkApplication compiler for submitted jobs
//!
//! Compiles `JobRequest` values into Spark operator `SparkApplication`
//! resources. Pure compilation crate: no cluster access.

mod compiler;
mod types;

pub use compiler::compile_spark_application;
pub use types::{
    DriverResources, ExecutorResources, RestartPolicy, SparkApplication, SparkApplicationSpec,
    SparkMetadata,
};

/// API group of the Spark operator CRDs
pub const SPARK_API_GROUP: &str = "sparkoperator.k8s.io";
/// Served version of the SparkApplication CRD
pub const SPARK_API_VERSION: &str = "v1beta2";
/// Kind name of the SparkApplication CRD
pub const SPARK_APPLICATION_KIND: &str = "SparkApplication";
/// Plural resource name used in API paths
pub const SPARK_APPLICATION_PLURAL: &str = "sparkapplications";
