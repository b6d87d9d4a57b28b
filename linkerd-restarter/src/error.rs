use std::io;
use std::path::PathBuf;

use linkerd_restarter_kubeapi::ClusterError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to locate the home directory")]
    HomeDir,

    #[error("failed to load cluster configuration from {}: {source}", .path.display())]
    Config { path: PathBuf, source: ClusterError },

    #[error("failed to get {namespace}/{name} deployment: {source}")]
    Fetch {
        namespace: String,
        name: String,
        source: ClusterError,
    },

    #[error("failed to list pods in {namespace}: {source}")]
    List {
        namespace: String,
        source: ClusterError,
    },

    #[error(r#"failed to restart "{deployment}": {source}"#)]
    Restart {
        deployment: String,
        source: ClusterError,
    },

    #[error(r#"failed to wait for pods of "{deployment}" [{pods}]: {source}"#)]
    Wait {
        deployment: String,
        pods: String,
        source: ClusterError,
    },

    #[error("failed to read confirmation: {0}")]
    Prompt(#[from] io::Error),

    #[error("interrupted")]
    Interrupted,
}
