//! Cluster API access
//!
//! Provides a trait-based abstraction over the API server so the orchestrator
//! can be tested without a cluster while production uses `kube::Client`.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{Api, DynamicObject, ListParams, PostParams};
use kube::Client;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::resource::{ClusterResource, KnownResource};
use crate::FIELD_MANAGER;

/// Trait abstracting the two cluster clients
///
/// Errors are returned unclassified; the orchestrator tags them with the
/// operation that produced them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterBackend: Send + Sync {
    /// List pods in a namespace, in API server order
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, kube::Error>;

    /// Create a resource; fails if one with the same name exists
    async fn create(&self, resource: ClusterResource) -> Result<(), kube::Error>;
}

/// Real backend over a shared kube client
#[derive(Clone)]
pub struct KubeBackend {
    client: Client,
}

impl KubeBackend {
    /// Create a new KubeBackend
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn post_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl ClusterBackend for KubeBackend {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, kube::Error> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn create(&self, resource: ClusterResource) -> Result<(), kube::Error> {
        let params = post_params();
        match resource {
            ClusterResource::Known(KnownResource::Namespace(ns)) => {
                let api: Api<Namespace> = Api::all(self.client.clone());
                api.create(&params, &ns).await?;
            }
            ClusterResource::Dynamic(dr) => {
                let ar = dr.descriptor.to_api_resource();
                let api: Api<DynamicObject> = match dr.namespace.as_deref() {
                    Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
                    None => Api::all_with(self.client.clone(), &ar),
                };
                debug!(
                    kind = %ar.kind,
                    api_version = %ar.api_version,
                    namespace = ?dr.namespace,
                    "creating dynamic resource"
                );
                api.create(&params, &dr.object).await?;
            }
        }
        Ok(())
    }
}
