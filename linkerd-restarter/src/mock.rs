use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

use k8s::ObjectMetaExt as _;
use k8s::appsv1;
use linkerd_restarter_kubeapi::ClusterError;

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    GetDeployment(String, String),
    ListPods(String),
    Restart(String, String),
    Wait(String, Vec<String>, Duration),
}

/// In-memory cluster recording every call it receives.
#[derive(Debug, Default)]
pub(crate) struct MockCluster {
    deployments: Vec<appsv1::Deployment>,
    pods: Vec<corev1::Pod>,
    fail_list: bool,
    failing_restarts: BTreeSet<String>,
    failing_waits: BTreeSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockCluster {
    pub(crate) fn injector(mut self, version: Option<&str>) -> Self {
        let mut deployment =
            appsv1::Deployment::new(linkerd::PROXY_INJECTOR, linkerd::CONTROL_PLANE_NAMESPACE);
        if let Some(version) = version {
            deployment.metadata = deployment
                .metadata
                .with_label(linkerd::VERSION_LABEL, version);
        }
        self.deployments.push(deployment);
        self
    }

    pub(crate) fn pod(mut self, name: &str, app: Option<&str>, created_by: Option<&str>) -> Self {
        let mut pod = corev1::Pod::new(name, config::DEFAULT_NAMESPACE);
        pod.metadata.uid = Some(format!("uid-{name}"));
        if let Some(app) = app {
            pod.metadata = pod.metadata.with_label(linkerd::APP_LABEL, app);
        }
        if let Some(created_by) = created_by {
            pod.metadata = pod
                .metadata
                .with_annotation(linkerd::CREATED_BY_ANNOTATION, created_by);
        }
        self.pods.push(pod);
        self
    }

    pub(crate) fn fail_list(self) -> Self {
        Self {
            fail_list: true,
            ..self
        }
    }

    pub(crate) fn fail_restart(mut self, deployment: &str) -> Self {
        self.failing_restarts.insert(deployment.to_string());
        self
    }

    /// Waits including `pod` time out.
    pub(crate) fn fail_wait(mut self, pod: &str) -> Self {
        self.failing_waits.insert(pod.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn restarts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Restart(_, name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Cluster for MockCluster {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<appsv1::Deployment, ClusterError> {
        self.record(Call::GetDeployment(namespace.to_string(), name.to_string()));
        self.deployments
            .iter()
            .find(|dep| {
                dep.metadata.namespace.as_deref() == Some(namespace)
                    && dep.metadata.name.as_deref() == Some(name)
            })
            .cloned()
            .ok_or_else(|| ClusterError::NotFound {
                kind: "deployment",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<corev1::Pod>, ClusterError> {
        self.record(Call::ListPods(namespace.to_string()));
        if self.fail_list {
            return Err(ClusterError::Timeout(Duration::from_secs(30)));
        }
        let pods = self
            .pods
            .iter()
            .filter(|pod| pod.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect();
        Ok(pods)
    }

    async fn restart_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.record(Call::Restart(namespace.to_string(), name.to_string()));
        if self.failing_restarts.contains(name) {
            return Err(ClusterError::Command {
                command: format!("kubectl rollout restart deployment {name}"),
                status: "exit status: 1".to_string(),
                stderr: format!(r#"deployments.apps "{name}" not found"#),
            });
        }
        Ok(())
    }

    async fn wait_for_deletion(
        &self,
        namespace: &str,
        pods: &[PodRef],
        timeout: Duration,
    ) -> Result<(), ClusterError> {
        let names = pods.iter().map(|pod| pod.name.clone()).collect::<Vec<_>>();
        let fail = names.iter().any(|name| self.failing_waits.contains(name));
        self.record(Call::Wait(namespace.to_string(), names, timeout));
        if fail {
            return Err(ClusterError::Timeout(timeout));
        }
        Ok(())
    }
}
