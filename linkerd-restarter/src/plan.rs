use std::collections::BTreeMap;
use std::collections::btree_map;

use super::*;

/// Snapshot of the Pod fields that decide whether it needs a restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodRecord {
    pub name: String,
    pub uid: String,
    /// Owning Deployment, from the `app` label
    pub deployment: Option<String>,
    pub created_by: Option<String>,
}

impl From<&corev1::Pod> for PodRecord {
    fn from(pod: &corev1::Pod) -> Self {
        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            uid: pod.metadata.uid.clone().unwrap_or_default(),
            deployment: pod.app().map(ToString::to_string),
            created_by: pod.created_by().map(ToString::to_string),
        }
    }
}

impl PodRecord {
    /// A Pod is stale when it was injected by a different injector version.
    ///
    /// Pods without the annotation are never stale.
    pub fn is_stale(&self, desired: &DesiredVersion) -> bool {
        match self.created_by.as_deref() {
            None | Some("") => false,
            Some(created_by) => created_by != desired.expected_created_by(),
        }
    }

    fn pod_ref(&self) -> PodRef {
        PodRef::new(&self.name, &self.uid)
    }
}

/// Stale Pods to wait on, grouped by owning Deployment.
///
/// Deployments are visited in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestartPlan(BTreeMap<String, Vec<PodRef>>);

impl RestartPlan {
    pub fn classify(pods: impl IntoIterator<Item = PodRecord>, desired: &DesiredVersion) -> Self {
        let mut plan = BTreeMap::<_, Vec<_>>::new();
        for pod in pods {
            if !pod.is_stale(desired) {
                continue;
            }
            let Some(deployment) = pod.deployment.as_deref().filter(|dep| !dep.is_empty()) else {
                continue;
            };
            plan.entry(deployment.to_string())
                .or_default()
                .push(pod.pod_ref());
        }
        Self(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn deployments(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn pods(&self, deployment: &str) -> Option<&[PodRef]> {
        self.0.get(deployment).map(Vec::as_slice)
    }
}

impl IntoIterator for RestartPlan {
    type Item = (String, Vec<PodRef>);
    type IntoIter = btree_map::IntoIter<String, Vec<PodRef>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// List the workload namespace once and build the plan from that snapshot.
pub async fn classify(
    cluster: &impl Cluster,
    config: &Config,
    desired: &DesiredVersion,
) -> Result<RestartPlan> {
    let namespace = &config.namespace;
    let pods = cluster
        .list_pods(namespace)
        .await
        .map_err(|source| Error::List {
            namespace: namespace.clone(),
            source,
        })?;

    let records = pods.iter().map(PodRecord::from);
    let plan = RestartPlan::classify(records, desired);
    tracing::debug!(%namespace, pods = pods.len(), deployments = plan.len(), "classified pods");
    Ok(plan)
}
