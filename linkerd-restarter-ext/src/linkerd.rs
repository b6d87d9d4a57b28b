use constcat::concat;

/// Namespace the Linkerd control plane is installed into
pub const CONTROL_PLANE_NAMESPACE: &str = "linkerd";

/// Deployment running the proxy injector webhook
pub const PROXY_INJECTOR: &str = concat!(CONTROL_PLANE_NAMESPACE, "-proxy-injector");

/// Component name the injector stamps on every injected Pod
pub const PROXY_INJECTOR_COMPONENT: &str = concat!(CONTROL_PLANE_NAMESPACE, "/proxy-injector");

pub const VERSION_LABEL: &str = "app.kubernetes.io/version";
pub const APP_LABEL: &str = "app";
pub const CREATED_BY_ANNOTATION: &str = "linkerd.io/created-by";

/// Pod template annotation `kubectl rollout restart` bumps to trigger a rollout
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Value of [`CREATED_BY_ANNOTATION`] on a Pod injected by the given injector version.
pub fn created_by(version: &str) -> String {
    format!("{PROXY_INJECTOR_COMPONENT} {version}")
}
