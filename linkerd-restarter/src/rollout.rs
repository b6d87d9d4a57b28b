use std::fmt;
use std::time::Duration;

use super::*;

/// Progress of one Deployment's restart.
///
/// Leaving `Pending` issues the restart, leaving `RestartIssued` waits for the
/// old Pods to be deleted, and leaving `WaitingForDeletion` pauses before the
/// next Deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RolloutState {
    Pending,
    RestartIssued,
    WaitingForDeletion,
    Done,
}

impl fmt::Display for RolloutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Pending => "pending",
            Self::RestartIssued => "restart-issued",
            Self::WaitingForDeletion => "waiting-for-deletion",
            Self::Done => "done",
        };
        f.write_str(state)
    }
}

/// Restart of one Deployment, driven one transition at a time.
#[derive(Debug)]
pub struct Rollout {
    deployment: String,
    pods: Vec<PodRef>,
    pause: Duration,
    state: RolloutState,
}

impl Rollout {
    pub fn new(deployment: impl ToString, pods: Vec<PodRef>) -> Self {
        Self {
            deployment: deployment.to_string(),
            pods,
            pause: Duration::ZERO,
            state: RolloutState::Pending,
        }
    }

    /// Time to sleep once the old Pods are gone.
    pub fn pause(self, pause: Duration) -> Self {
        Self { pause, ..self }
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn state(&self) -> RolloutState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RolloutState::Done
    }

    /// Perform the next transition. Errors leave the state unchanged.
    pub async fn advance(&mut self, cluster: &impl Cluster, config: &Config) -> Result<RolloutState> {
        let next = match self.state {
            RolloutState::Pending => {
                tracing::info!(deployment = %self.deployment, "Start restarting");
                cluster
                    .restart_deployment(&config.namespace, &self.deployment)
                    .await
                    .map_err(|source| Error::Restart {
                        deployment: self.deployment.clone(),
                        source,
                    })?;
                RolloutState::RestartIssued
            }
            RolloutState::RestartIssued => {
                tracing::info!(
                    deployment = %self.deployment,
                    pods = %self.pod_list(),
                    "Start waiting"
                );
                cluster
                    .wait_for_deletion(&config.namespace, &self.pods, config.timeout)
                    .await
                    .map_err(|source| Error::Wait {
                        deployment: self.deployment.clone(),
                        pods: self.pod_list(),
                        source,
                    })?;
                tracing::info!(
                    deployment = %self.deployment,
                    pods = %self.pod_list(),
                    "Finish waiting"
                );
                RolloutState::WaitingForDeletion
            }
            RolloutState::WaitingForDeletion => {
                if !self.pause.is_zero() {
                    tracing::debug!(
                        deployment = %self.deployment,
                        pause = ?self.pause,
                        "pausing before next deployment"
                    );
                    tokio::time::sleep(self.pause).await;
                }
                RolloutState::Done
            }
            RolloutState::Done => RolloutState::Done,
        };
        self.state = next;
        Ok(next)
    }

    /// Drive the rollout to `Done`.
    pub async fn run(&mut self, cluster: &impl Cluster, config: &Config) -> Result<()> {
        while !self.is_done() {
            self.advance(cluster, config).await?;
        }
        Ok(())
    }

    fn pod_list(&self) -> String {
        self.pods
            .iter()
            .map(PodRef::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Restart every Deployment in the plan, strictly one after another.
///
/// The first failure aborts the run; later Deployments are never touched and
/// the failed restart is not rolled back. Returns the number of Deployments restarted.
pub async fn execute(cluster: &impl Cluster, config: &Config, plan: RestartPlan) -> Result<usize> {
    let total = plan.len();
    for (index, (deployment, pods)) in plan.into_iter().enumerate() {
        // Nothing follows the last Deployment, so it gets no pause.
        let pause = if index + 1 < total {
            config.sleep
        } else {
            Duration::ZERO
        };
        Rollout::new(deployment, pods)
            .pause(pause)
            .run(cluster, config)
            .await?;
    }
    Ok(total)
}
