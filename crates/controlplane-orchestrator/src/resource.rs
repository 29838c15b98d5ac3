//! Resource model shared by typed and dynamic submissions
//!
//! Kinds compiled into `k8s-openapi` travel as [`KnownResource`]; kinds whose
//! schema only the API server knows (CRDs) travel as [`DynamicResource`], an
//! attribute tree addressed by group/version/plural.

use k8s_openapi::api::core::v1::Namespace;
use kube::api::{DynamicObject, ObjectMeta};
use kube::discovery::ApiResource;

use controlplane_common::{Error, JobRequest};
use controlplane_spark::{
    compile_spark_application, SPARK_API_GROUP, SPARK_API_VERSION, SPARK_APPLICATION_KIND,
    SPARK_APPLICATION_PLURAL,
};

/// Addresses a resource kind by group, version and plural name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// API group (empty for the core group)
    pub api_group: String,
    /// API version within the group
    pub api_version: String,
    /// Plural resource name used in URL paths
    pub resource_kind_plural: String,
    /// Kind name written into submitted objects
    pub kind: String,
}

impl ResourceDescriptor {
    /// Descriptor of the Spark operator's SparkApplication CRD
    pub fn spark_application() -> Self {
        Self {
            api_group: SPARK_API_GROUP.to_string(),
            api_version: SPARK_API_VERSION.to_string(),
            resource_kind_plural: SPARK_APPLICATION_PLURAL.to_string(),
            kind: SPARK_APPLICATION_KIND.to_string(),
        }
    }

    /// `group/version`, or just `version` for the core group
    pub fn group_version(&self) -> String {
        if self.api_group.is_empty() {
            self.api_version.clone()
        } else {
            format!("{}/{}", self.api_group, self.api_version)
        }
    }

    /// Convert to the kube dynamic-client address
    pub fn to_api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.api_group.clone(),
            version: self.api_version.clone(),
            api_version: self.group_version(),
            kind: self.kind.clone(),
            plural: self.resource_kind_plural.clone(),
        }
    }
}

/// A resource whose kind is known at compile time
#[derive(Clone, Debug)]
pub enum KnownResource {
    /// Cluster-scoped namespace
    Namespace(Namespace),
}

impl KnownResource {
    /// Namespace with only a name set
    pub fn namespace(name: &str) -> Self {
        KnownResource::Namespace(Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
    }
}

/// A resource addressed dynamically with a generic attribute tree
#[derive(Clone, Debug)]
pub struct DynamicResource {
    /// Kind address
    pub descriptor: ResourceDescriptor,
    /// Target namespace; `None` for cluster-scoped kinds
    pub namespace: Option<String>,
    /// The object to create
    pub object: DynamicObject,
}

/// Anything the orchestrator can submit
#[derive(Clone, Debug)]
pub enum ClusterResource {
    /// Typed handle
    Known(KnownResource),
    /// Descriptor plus attribute tree
    Dynamic(DynamicResource),
}

impl ClusterResource {
    /// Name of the object being submitted
    pub fn name(&self) -> &str {
        let name = match self {
            ClusterResource::Known(KnownResource::Namespace(ns)) => ns.metadata.name.as_deref(),
            ClusterResource::Dynamic(dr) => dr.object.metadata.name.as_deref(),
        };
        name.unwrap_or_default()
    }

    /// Kind of the object being submitted
    pub fn kind(&self) -> &str {
        match self {
            ClusterResource::Known(KnownResource::Namespace(_)) => "Namespace",
            ClusterResource::Dynamic(dr) => &dr.descriptor.kind,
        }
    }

    /// Namespace the object is created in, if namespaced
    pub fn namespace(&self) -> Option<&str> {
        match self {
            ClusterResource::Known(KnownResource::Namespace(_)) => None,
            ClusterResource::Dynamic(dr) => dr.namespace.as_deref(),
        }
    }
}

/// Build the SparkApplication submission for a job.
///
/// Pure: the same namespace and request always produce the same object.
pub fn spark_job_resource(namespace: &str, job: &JobRequest) -> Result<ClusterResource, Error> {
    let app = compile_spark_application(namespace, job);
    let tree = serde_json::to_value(&app).map_err(|e| {
        Error::internal_with_context("submit_job", format!("failed to encode SparkApplication: {}", e))
    })?;
    let object: DynamicObject = serde_json::from_value(tree).map_err(|e| {
        Error::internal_with_context("submit_job", format!("failed to build dynamic object: {}", e))
    })?;

    Ok(ClusterResource::Dynamic(DynamicResource {
        descriptor: ResourceDescriptor::spark_application(),
        namespace: Some(namespace.to_string()),
        object,
    }))
}
