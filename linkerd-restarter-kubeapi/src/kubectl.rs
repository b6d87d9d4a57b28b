use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use super::*;

/// Restarts and waits by shelling out to `kubectl`; reads still go through [`KubeApi`].
#[derive(Debug)]
pub struct Kubectl {
    kubeapi: KubeApi,
    cli: KubectlCli,
}

impl Kubectl {
    pub fn new(kubeapi: KubeApi) -> Self {
        let cli = KubectlCli {
            program: PathBuf::from("kubectl"),
            kubeconfig: None,
        };
        Self { kubeapi, cli }
    }

    /// Use a specific `kubectl` binary instead of looking it up on `PATH`.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.cli.program = program.into();
        self
    }

    /// Point `kubectl` at the same kubeconfig the API client was built from.
    pub fn kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> Self {
        self.cli.kubeconfig = Some(kubeconfig.into());
        self
    }
}

#[derive(Debug)]
struct KubectlCli {
    program: PathBuf,
    kubeconfig: Option<PathBuf>,
}

impl KubectlCli {
    fn global_args(&self, namespace: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push(format!("--kubeconfig={}", kubeconfig.display()));
        }
        args.push(format!("--namespace={namespace}"));
        args
    }

    fn restart_args(&self, namespace: &str, name: &str) -> Vec<String> {
        let mut args = self.global_args(namespace);
        args.extend(["rollout", "restart", "deployment", name].map(String::from));
        args
    }

    fn wait_args(&self, namespace: &str, pods: &[PodRef], timeout: Duration) -> Vec<String> {
        let mut args = self.global_args(namespace);
        args.push("wait".to_string());
        args.push("--for=delete".to_string());
        args.push(format!("--timeout={}", go_duration(timeout)));
        args.extend(pods.iter().map(PodRef::to_string));
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<String, ClusterError> {
        let program = self.program.display().to_string();
        tracing::debug!(program, ?args, "running");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ClusterError::Launch {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(ClusterError::Command {
                command: format!("{program} {}", args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Cluster for Kubectl {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<appsv1::Deployment, ClusterError> {
        self.kubeapi.get_deployment(namespace, name).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<corev1::Pod>, ClusterError> {
        self.kubeapi.list_pods(namespace).await
    }

    async fn restart_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let args = self.cli.restart_args(namespace, name);
        let output = self.cli.run(args).await?;
        tracing::info!(namespace, name, %output, "deployment restarted");
        Ok(())
    }

    async fn wait_for_deletion(
        &self,
        namespace: &str,
        pods: &[PodRef],
        timeout: Duration,
    ) -> Result<(), ClusterError> {
        if pods.is_empty() {
            return Ok(());
        }
        let args = self.cli.wait_args(namespace, pods, timeout);
        self.cli.run(args).await.map(drop)
    }
}

/// Render a duration in the Go syntax `kubectl --timeout` accepts.
fn go_duration(duration: Duration) -> String {
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        format!("{}s", duration.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{}ns", duration.as_nanos())
    }
}
