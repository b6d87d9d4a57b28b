use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use kube::api;
use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::runtime::conditions;
use kube::runtime::wait::await_condition;
use linkerd_restarter_ext as k8s;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use k8s::appsv1;
use k8s::corev1;
use k8s::linkerd;

pub use error::ClusterError;
pub use kubectl::Kubectl;

mod error;
mod kubectl;

const FIELD_MANAGER: &str = "linkerd-restarter";

/// Cluster operations the restarter depends on.
///
/// Reads return objects with only `metadata` guaranteed to be populated.
pub trait Cluster {
    fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<appsv1::Deployment, ClusterError>> + Send;

    fn list_pods(
        &self,
        namespace: &str,
    ) -> impl Future<Output = Result<Vec<corev1::Pod>, ClusterError>> + Send;

    /// Trigger a rolling restart of the Deployment's Pods.
    fn restart_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<(), ClusterError>> + Send;

    /// Block until every Pod in `pods` is gone, or fail once `timeout` elapses.
    fn wait_for_deletion(
        &self,
        namespace: &str,
        pods: &[PodRef],
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ClusterError>> + Send;
}

/// A Pod instance to wait on.
///
/// The UID distinguishes the listed Pod from a later Pod reusing its name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PodRef {
    pub name: String,
    pub uid: String,
}

impl PodRef {
    pub fn new(name: impl ToString, uid: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            uid: uid.to_string(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pod/{}", self.name)
    }
}

pub struct KubeApi {
    list_params: api::ListParams,
    patch_params: api::PatchParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi from the kubeconfig file at `path`, using its current context.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), linkerd_restarter_kubeapi::ClusterError> {
    /// let api = linkerd_restarter_kubeapi::KubeApi::from_kubeconfig("/root/.kube/config").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_kubeconfig(path: impl AsRef<Path>) -> Result<Self, ClusterError> {
        let kubeconfig = Kubeconfig::read_from(path)?;
        let options = KubeConfigOptions::default();
        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        let client = kube::Client::try_from(config)?;
        Ok(Self::with_client(client))
    }

    fn with_client(client: kube::Client) -> Self {
        let patch_params = api::PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..k8s::default()
        };
        Self {
            list_params: api::ListParams::default(),
            patch_params,
            client,
        }
    }

    fn deployments(&self, namespace: &str) -> api::Api<appsv1::Deployment> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }

    fn patch_params(&self) -> &api::PatchParams {
        &self.patch_params
    }
}

impl Cluster for KubeApi {
    /// Fetch the metadata of a Deployment, failing with `NotFound` when it does not exist.
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<appsv1::Deployment, ClusterError> {
        let meta = self
            .deployments(namespace)
            .get_metadata_opt(name)
            .await?
            .ok_or_else(|| ClusterError::NotFound {
                kind: "deployment",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;
        Ok(appsv1::Deployment {
            metadata: meta.metadata,
            ..k8s::default()
        })
    }

    /// Retrieve metadata for all Pods in `namespace`.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<corev1::Pod>, ClusterError> {
        let lp = self.list_params();
        let list = self.pods(namespace).list_metadata(lp).await?;
        let pods = list
            .items
            .into_iter()
            .map(|meta| corev1::Pod {
                metadata: meta.metadata,
                ..k8s::default()
            })
            .collect();
        Ok(pods)
    }

    /// Restart a Deployment the way `kubectl rollout restart` does: bump the
    /// `restartedAt` annotation on its Pod template so the controller rolls a new ReplicaSet.
    async fn restart_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let patch = restart_patch(OffsetDateTime::now_utc())?;
        let pp = self.patch_params();
        self.deployments(namespace)
            .patch(name, pp, &api::Patch::Strategic(&patch))
            .await?;
        tracing::info!(namespace, name, "deployment restarted");
        Ok(())
    }

    /// Watch each Pod until it is deleted (or replaced under the same name).
    ///
    /// `timeout` bounds the wait for the whole set, not each Pod.
    async fn wait_for_deletion(
        &self,
        namespace: &str,
        pods: &[PodRef],
        timeout: Duration,
    ) -> Result<(), ClusterError> {
        let api = self.pods(namespace);
        let all_deleted = async {
            for pod in pods {
                let deleted = conditions::is_deleted(&pod.uid);
                await_condition(api.clone(), &pod.name, deleted).await?;
                tracing::debug!(namespace, %pod, "pod deleted");
            }
            Ok::<_, ClusterError>(())
        };
        tokio::time::timeout(timeout, all_deleted)
            .await
            .map_err(|_| ClusterError::Timeout(timeout))?
    }
}

/// Strategic-merge patch stamping `restarted_at` on a Deployment's Pod template.
fn restart_patch(restarted_at: OffsetDateTime) -> Result<serde_json::Value, ClusterError> {
    let restarted_at = restarted_at.format(&Rfc3339)?;
    let annotations = BTreeMap::from([(linkerd::RESTARTED_AT_ANNOTATION, restarted_at)]);
    let patch = serde_json::json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": annotations
                }
            }
        }
    });
    Ok(patch)
}

impl fmt::Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, redacting the `client`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("patch_params", &self.patch_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

#[cfg(test)]
mod tests;
