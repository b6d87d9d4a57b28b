use std::time::Duration;

use time::ext::NumericalStdDuration as _;

use super::*;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Settings for a single run, built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Namespace whose Pods are checked and whose Deployments get restarted
    pub namespace: String,
    /// Namespace of the Linkerd control plane
    pub control_plane_namespace: String,
    /// Deployment carrying the desired proxy version label
    pub injector: String,
    /// Upper bound on waiting for one Deployment's old Pods to go away
    pub timeout: Duration,
    /// Pause between two consecutive Deployment restarts
    pub sleep: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            control_plane_namespace: linkerd::CONTROL_PLANE_NAMESPACE.to_string(),
            injector: linkerd::PROXY_INJECTOR.to_string(),
            timeout: 10.std_minutes(),
            sleep: 1.std_minutes(),
        }
    }
}

impl Config {
    pub fn namespace(self, namespace: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..self
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn sleep(self, sleep: Duration) -> Self {
        Self { sleep, ..self }
    }
}
