use super::*;

/// Restart Deployments whose Linkerd proxies are older than the control plane.
#[derive(Debug, Parser)]
#[command(name = "linkerd-dataplane-restarter", version)]
pub(crate) struct Args {
    /// How long to wait for the old pods of a deployment to be deleted
    #[arg(short, long, default_value = "10m", value_parser = parse_duration)]
    pub(crate) timeout: Duration,

    /// How long to wait between restarting two deployments
    #[arg(short, long, default_value = "1m", value_parser = parse_duration)]
    pub(crate) sleep: Duration,

    /// Namespace whose deployments are checked and restarted
    #[arg(short, long, default_value = config::DEFAULT_NAMESPACE)]
    pub(crate) namespace: String,

    /// Kubeconfig file [default: ~/.kube/config]
    #[arg(long)]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// Restart and wait through kubectl instead of the Kubernetes API
    #[arg(long)]
    pub(crate) kubectl: bool,

    /// kubectl binary used with --kubectl
    #[arg(long, default_value = "kubectl")]
    pub(crate) kubectl_path: PathBuf,
}

impl Args {
    pub(crate) fn config(&self) -> Config {
        Config::default()
            .namespace(&self.namespace)
            .timeout(self.timeout)
            .sleep(self.sleep)
    }

    pub(crate) fn kubeconfig(&self) -> Result<PathBuf> {
        match &self.kubeconfig {
            Some(path) => Ok(path.clone()),
            None => home::home_dir()
                .map(|home| home.join(".kube").join("config"))
                .ok_or(Error::HomeDir),
        }
    }
}

/// Parse a Go-style duration such as `90s`, `1m30s` or `10m`.
pub(crate) fn parse_duration(text: &str) -> Result<Duration, String> {
    let nanos = go_parse_duration::parse_duration(text)
        .map_err(|err| format!("invalid duration {text:?}: {err:?}"))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| format!("duration {text:?} must not be negative"))
}
