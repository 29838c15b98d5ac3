//! The orchestrator: validated requests in, cluster calls out
//!
//! Each operation validates its input, makes exactly one cluster call and
//! returns. Failures are classified and tagged with the operation name; there
//! is no retry. Dropping an operation's future abandons the in-flight request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use controlplane_common::request::validate_dns_label;
use controlplane_common::{Error, JobRequest, WorkspaceRequest};

use crate::backend::ClusterBackend;
use crate::resource::{spark_job_resource, ClusterResource, KnownResource};

const OP_LIST_PODS: &str = "list_pods";
const OP_CREATE_WORKSPACE: &str = "create_workspace";
const OP_SUBMIT_JOB: &str = "submit_job";

/// Stateless request-to-resource translator
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ClusterBackend>,
    request_timeout: Option<Duration>,
}

impl Orchestrator {
    /// Create an orchestrator over a cluster backend with no operation deadline
    pub fn new(backend: Arc<dyn ClusterBackend>) -> Self {
        Self {
            backend,
            request_timeout: None,
        }
    }

    /// Bound every cluster call by `timeout`; expiry surfaces as a transport error
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Names of all pods in `namespace`, in the order the API server returns them
    #[instrument(skip(self))]
    pub async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, Error> {
        validate_dns_label("namespace", namespace)?;

        let pods = self
            .call(OP_LIST_PODS, namespace, self.backend.list_pods(namespace))
            .await?;

        let names: Vec<String> = pods
            .into_iter()
            .filter_map(|pod| pod.metadata.name)
            .collect();
        debug!(count = names.len(), "listed pods");
        Ok(names)
    }

    /// Create a namespace named `req.name`.
    ///
    /// Not idempotent: a second call with the same name fails with `Conflict`.
    #[instrument(skip(self, req), fields(workspace = %req.name))]
    pub async fn create_workspace(&self, req: &WorkspaceRequest) -> Result<(), Error> {
        req.validate()?;

        let resource = ClusterResource::Known(KnownResource::namespace(&req.name));
        self.submit_resource(OP_CREATE_WORKSPACE, resource).await?;
        info!("workspace created");
        Ok(())
    }

    /// Submit `req` as a SparkApplication in `namespace`
    #[instrument(skip(self, req), fields(job = %req.name))]
    pub async fn submit_job(&self, namespace: &str, req: &JobRequest) -> Result<(), Error> {
        validate_dns_label("namespace", namespace)?;
        req.validate()?;

        let resource = spark_job_resource(namespace, req)?;
        self.submit_resource(OP_SUBMIT_JOB, resource).await?;
        info!(
            executors = req.executor.instance_count,
            mode = %req.execution_mode,
            "job submitted"
        );
        Ok(())
    }

    /// Create any typed or dynamic resource, tagging failures with `operation`
    pub async fn submit_resource(
        &self,
        operation: &str,
        resource: ClusterResource,
    ) -> Result<(), Error> {
        let name = resource.name().to_string();
        debug!(
            operation,
            kind = %resource.kind(),
            resource = %name,
            namespace = ?resource.namespace(),
            "submitting resource"
        );
        self.call(operation, &name, self.backend.create(resource)).await
    }

    async fn call<T, F>(&self, operation: &str, name: &str, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, kube::Error>>,
    {
        let result = match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        operation,
                        resource = %name,
                        timeout = ?limit,
                        "cluster call timed out"
                    );
                    return Err(Error::timeout(operation, limit));
                }
            },
            None => fut.await,
        };

        result.map_err(|e| {
            let err = Error::from_kube(operation, name, e);
            warn!(error = %err, "cluster call failed");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use k8s_openapi::api::core::v1::Pod;
    use kube::api::ObjectMeta;
    use kube::core::ErrorResponse;

    use super::*;
    use crate::backend::MockClusterBackend;
    use controlplane_common::{DriverSpec, ExecutionMode, ExecutorSpec};

    fn pod(name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{} from api server", reason),
            reason: reason.to_string(),
            code,
        })
    }

    fn connection_refused() -> kube::Error {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        kube::Error::Service(Box::new(io))
    }

    fn job1() -> JobRequest {
        JobRequest {
            name: "job1".to_string(),
            execution_mode: ExecutionMode::Cluster,
            container_image: "img:1".to_string(),
            runtime_version: "3.1.1".to_string(),
            entry_point_path: "local:///app.py".to_string(),
            arguments: vec!["--x".to_string(), "1".to_string()],
            driver: DriverSpec {
                memory: "1g".to_string(),
                cpu_cores: 1,
                service_account: "spark".to_string(),
            },
            executor: ExecutorSpec {
                memory: "2g".to_string(),
                cpu_cores: 2,
                instance_count: 3,
            },
        }
    }

    fn orchestrator(mock: MockClusterBackend) -> Orchestrator {
        Orchestrator::new(Arc::new(mock))
    }

    // ==========================================================================
    // list_pods
    // ==========================================================================

    #[tokio::test]
    async fn list_pods_preserves_api_order() {
        let mut mock = MockClusterBackend::new();
        mock.expect_list_pods()
            .withf(|ns| ns == "default")
            .times(1)
            .returning(|_| Ok(vec![pod("web-2"), pod("api-0"), pod("web-1")]));
        mock.expect_create().never();

        let names = orchestrator(mock).list_pods("default").await.unwrap();
        assert_eq!(names, vec!["web-2", "api-0", "web-1"]);
    }

    #[tokio::test]
    async fn list_pods_uses_requested_namespace() {
        let mut mock = MockClusterBackend::new();
        mock.expect_list_pods()
            .withf(|ns| ns == "analytics")
            .times(1)
            .returning(|_| Ok(vec![]));

        let names = orchestrator(mock).list_pods("analytics").await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn list_pods_transport_failure_returns_no_pods() {
        let mut mock = MockClusterBackend::new();
        mock.expect_list_pods()
            .times(1)
            .returning(|_| Err(connection_refused()));

        let err = orchestrator(mock).list_pods("default").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.operation(), Some("list_pods"));
    }

    #[tokio::test]
    async fn list_pods_can_repeat_without_writes() {
        let mut mock = MockClusterBackend::new();
        mock.expect_list_pods()
            .times(3)
            .returning(|_| Ok(vec![pod("a")]));
        mock.expect_create().never();

        let orch = orchestrator(mock);
        for _ in 0..3 {
            assert_eq!(orch.list_pods("default").await.unwrap(), vec!["a"]);
        }
    }

    #[tokio::test]
    async fn list_pods_rejects_invalid_namespace() {
        let mut mock = MockClusterBackend::new();
        mock.expect_list_pods().never();

        let err = orchestrator(mock).list_pods("Bad_NS").await.unwrap_err();
        assert!(err.is_validation());
    }

    // ==========================================================================
    // create_workspace
    // ==========================================================================

    #[tokio::test]
    async fn create_workspace_submits_namespace() {
        let mut mock = MockClusterBackend::new();
        mock.expect_create()
            .withf(|r| {
                matches!(r, ClusterResource::Known(KnownResource::Namespace(_)))
                    && r.name() == "team-a"
            })
            .times(1)
            .returning(|_| Ok(()));

        let req = WorkspaceRequest {
            name: "team-a".to_string(),
        };
        orchestrator(mock).create_workspace(&req).await.unwrap();
    }

    #[tokio::test]
    async fn create_workspace_second_call_conflicts() {
        let mut created = 0;
        let mut mock = MockClusterBackend::new();
        mock.expect_create().times(2).returning(move |_| {
            created += 1;
            if created == 1 {
                Ok(())
            } else {
                Err(api_error(409, "AlreadyExists"))
            }
        });

        let orch = orchestrator(mock);
        let req = WorkspaceRequest {
            name: "team-a".to_string(),
        };

        orch.create_workspace(&req).await.unwrap();
        let err = orch.create_workspace(&req).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.operation(), Some("create_workspace"));
    }

    #[tokio::test]
    async fn empty_workspace_name_never_reaches_client() {
        let mut mock = MockClusterBackend::new();
        mock.expect_create().never();

        let req = WorkspaceRequest {
            name: String::new(),
        };
        let err = orchestrator(mock).create_workspace(&req).await.unwrap_err();
        assert!(err.is_validation());
    }

    // ==========================================================================
    // submit_job
    // ==========================================================================

    #[tokio::test]
    async fn submit_job_builds_spark_application() {
        let captured: Arc<Mutex<Option<ClusterResource>>> = Arc::new(Mutex::new(None));
        let sink = captured.clone();

        let mut mock = MockClusterBackend::new();
        mock.expect_create().times(1).returning(move |r| {
            *sink.lock().unwrap() = Some(r);
            Ok(())
        });

        orchestrator(mock).submit_job("default", &job1()).await.unwrap();

        let resource = captured.lock().unwrap().take().unwrap();
        let ClusterResource::Dynamic(dr) = resource else {
            panic!("job must be submitted dynamically");
        };
        assert_eq!(dr.descriptor.resource_kind_plural, "sparkapplications");
        assert_eq!(dr.namespace.as_deref(), Some("default"));
        assert_eq!(dr.object.metadata.name.as_deref(), Some("job1"));
        assert_eq!(dr.object.data["spec"]["driver"]["cores"], 1);
        assert_eq!(dr.object.data["spec"]["executor"]["instances"], 3);
        assert_eq!(dr.object.data["spec"]["restartPolicy"]["type"], "Never");
    }

    #[tokio::test]
    async fn submit_job_trees_are_identical_for_identical_requests() {
        let trees: Arc<Mutex<Vec<Vec<u8>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = trees.clone();

        let mut mock = MockClusterBackend::new();
        mock.expect_create().times(2).returning(move |r| {
            if let ClusterResource::Dynamic(dr) = r {
                sink.lock()
                    .unwrap()
                    .push(serde_json::to_vec(&dr.object).unwrap());
            }
            Ok(())
        });

        let orch = orchestrator(mock);
        orch.submit_job("default", &job1()).await.unwrap();
        orch.submit_job("default", &job1()).await.unwrap();

        let trees = trees.lock().unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0], trees[1]);
    }

    #[tokio::test]
    async fn submit_job_admission_rejection_passes_through() {
        let mut mock = MockClusterBackend::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Err(api_error(422, "Invalid")));

        let err = orchestrator(mock)
            .submit_job("default", &job1())
            .await
            .unwrap_err();
        match err {
            Error::Orchestrator {
                operation, code, ..
            } => {
                assert_eq!(operation, "submit_job");
                assert_eq!(code, 422);
            }
            other => panic!("expected Orchestrator, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_job_never_reaches_client() {
        let mut mock = MockClusterBackend::new();
        mock.expect_create().never();

        let mut job = job1();
        job.executor.memory = "lots".to_string();

        let err = orchestrator(mock)
            .submit_job("default", &job)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // ==========================================================================
    // deadlines and cancellation
    // ==========================================================================

    /// Backend whose calls never finish; counts how many in-flight calls were dropped
    struct HangingBackend {
        dropped: Arc<AtomicUsize>,
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ClusterBackend for HangingBackend {
        async fn list_pods(&self, _namespace: &str) -> Result<Vec<Pod>, kube::Error> {
            let _guard = DropCounter(self.dropped.clone());
            std::future::pending::<()>().await;
            Ok(vec![])
        }

        async fn create(&self, _resource: ClusterResource) -> Result<(), kube::Error> {
            let _guard = DropCounter(self.dropped.clone());
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn deadline_abandons_in_flight_call() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let orch = Orchestrator::new(Arc::new(HangingBackend {
            dropped: dropped.clone(),
        }))
        .with_request_timeout(Some(Duration::from_millis(20)));

        let err = orch.submit_job("default", &job1()).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.operation(), Some("submit_job"));
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_operation_cancels_client_call() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let orch = Orchestrator::new(Arc::new(HangingBackend {
            dropped: dropped.clone(),
        }));

        let outcome =
            tokio::time::timeout(Duration::from_millis(20), orch.list_pods("default")).await;

        assert!(outcome.is_err());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }
}
