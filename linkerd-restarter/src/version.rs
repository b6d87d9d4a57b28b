use std::fmt;

use super::*;

/// Proxy version the control plane currently injects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesiredVersion(String);

impl DesiredVersion {
    pub fn new(version: impl ToString) -> Self {
        Self(version.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `linkerd.io/created-by` value carried by Pods injected at this version
    pub fn expected_created_by(&self) -> String {
        linkerd::created_by(&self.0)
    }
}

impl fmt::Display for DesiredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the desired version off the proxy injector Deployment's version label.
///
/// A missing label resolves to an empty version.
pub async fn resolve(cluster: &impl Cluster, config: &Config) -> Result<DesiredVersion> {
    let namespace = &config.control_plane_namespace;
    let name = &config.injector;
    let deployment = cluster
        .get_deployment(namespace, name)
        .await
        .map_err(|source| Error::Fetch {
            namespace: namespace.clone(),
            name: name.clone(),
            source,
        })?;

    let version = DesiredVersion::new(deployment.version().unwrap_or_default());
    tracing::info!(%version, "Desired linkerd version");
    Ok(version)
}
