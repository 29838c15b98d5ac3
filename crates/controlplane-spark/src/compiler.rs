//! SparkApplication compilation from job requests
//!
//! Maps `JobRequest` fields onto a SparkApplication. The output depends only on
//! the request and namespace, so the same input always yields the same object.

use controlplane_common::JobRequest;

use crate::types::{
    DriverResources, ExecutorResources, RestartPolicy, SparkApplication, SparkApplicationSpec,
    SparkMetadata,
};
use crate::{SPARK_API_GROUP, SPARK_API_VERSION, SPARK_APPLICATION_KIND};

/// Jobs are always Python applications on Python 3
const APPLICATION_TYPE: &str = "Python";
const PYTHON_VERSION: &str = "3";
/// Failed driver pods are never restarted here; recovery belongs to the Spark operator
const RESTART_NEVER: &str = "Never";

/// Compile a job request into a SparkApplication in `namespace`.
///
/// Does not validate the request; callers run `JobRequest::validate` first.
pub fn compile_spark_application(namespace: &str, job: &JobRequest) -> SparkApplication {
    SparkApplication {
        api_version: format!("{}/{}", SPARK_API_GROUP, SPARK_API_VERSION),
        kind: SPARK_APPLICATION_KIND.to_string(),
        metadata: SparkMetadata {
            name: job.name.clone(),
            namespace: namespace.to_string(),
        },
        spec: SparkApplicationSpec {
            app_type: APPLICATION_TYPE.to_string(),
            python_version: PYTHON_VERSION.to_string(),
            mode: job.execution_mode.to_string(),
            image: job.container_image.clone(),
            spark_version: job.runtime_version.clone(),
            main_application_file: job.entry_point_path.clone(),
            arguments: job.arguments.clone(),
            restart_policy: RestartPolicy {
                policy_type: RESTART_NEVER.to_string(),
            },
            driver: DriverResources {
                memory: job.driver.memory.clone(),
                cores: job.driver.cpu_cores,
                service_account: job.driver.service_account.clone(),
            },
            executor: ExecutorResources {
                memory: job.executor.memory.clone(),
                cores: job.executor.cpu_cores,
                instances: job.executor.instance_count,
            },
        },
    }
}
