use std::io;
use std::time::Duration;

use kube::config::KubeconfigError;
use kube::runtime::wait;

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),

    #[error(r#"{kind} "{namespace}/{name}" not found"#)]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("watch failed: {0}")]
    Wait(#[from] wait::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to format restart timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },
}
