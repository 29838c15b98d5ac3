//! Resource orchestration layer
//!
//! Translates workload requests into cluster resources and submits them:
//! - `list_pods`: typed read of pod names in a namespace
//! - `create_workspace`: typed create of a Namespace
//! - `submit_job`: dynamic create of a Spark operator SparkApplication
//!
//! Typed and dynamic resources share one submission path through
//! [`ClusterResource`], so the orchestrator needs a single [`ClusterBackend`].
//! Nothing is cached between calls; the cluster holds all state.

#![deny(missing_docs)]

pub mod backend;
pub mod orchestrator;
pub mod resource;

pub use backend::{ClusterBackend, KubeBackend};
pub use orchestrator::Orchestrator;
pub use resource::{ClusterResource, DynamicResource, KnownResource, ResourceDescriptor};

/// Field manager recorded on objects we create
pub const FIELD_MANAGER: &str = "controlplane";
