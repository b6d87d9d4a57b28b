use linkerd_restarter_ext as k8s;
use linkerd_restarter_kubeapi::Cluster;
use linkerd_restarter_kubeapi::PodRef;

use k8s::DeploymentExt as _;
use k8s::PodExt as _;
use k8s::corev1;
use k8s::linkerd;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use plan::PodRecord;
pub use plan::RestartPlan;
pub use rollout::Rollout;
pub use rollout::RolloutState;
pub use version::DesiredVersion;

pub mod config;
pub mod gate;
pub mod plan;
pub mod rollout;
pub mod version;

mod error;

/// Finds Deployments with outdated Linkerd proxies and restarts them.
#[derive(Debug)]
pub struct Restarter<'a, C> {
    cluster: &'a C,
    config: &'a Config,
}

impl<'a, C: Cluster> Restarter<'a, C> {
    pub fn new(cluster: &'a C, config: &'a Config) -> Self {
        Self { cluster, config }
    }

    /// Resolve the desired proxy version and collect the Deployments running older proxies.
    pub async fn plan(&self) -> Result<RestartPlan> {
        let desired = version::resolve(self.cluster, self.config).await?;
        plan::classify(self.cluster, self.config, &desired).await
    }

    pub async fn execute(&self, plan: RestartPlan) -> Result<usize> {
        rollout::execute(self.cluster, self.config, plan).await
    }
}

#[cfg(test)]
mod mock;
