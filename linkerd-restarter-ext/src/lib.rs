pub use k8s_openapi::api::apps::v1 as appsv1;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub mod linkerd;

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self;
    fn with_label(self, key: impl ToString, value: impl ToString) -> Self;
    fn with_annotation(self, key: impl ToString, value: impl ToString) -> Self;
    fn label(&self, key: &str) -> Option<&str>;
    fn annotation(&self, key: &str) -> Option<&str>;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }

    fn with_label(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.labels
            .get_or_insert_with(default)
            .insert(key.to_string(), value.to_string());
        self
    }

    fn with_annotation(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.annotations
            .get_or_insert_with(default)
            .insert(key.to_string(), value.to_string());
        self
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.labels.as_ref()?.get(key).map(String::as_str)
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.as_ref()?.get(key).map(String::as_str)
    }
}

pub trait PodExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;
    /// Owning application, taken from the `app` label.
    fn app(&self) -> Option<&str>;
    /// Injector component and version that added the proxy sidecar.
    fn created_by(&self) -> Option<&str>;
}

impl PodExt for corev1::Pod {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::with_namespace(name, namespace);
        Self {
            metadata,
            ..default()
        }
    }

    fn app(&self) -> Option<&str> {
        self.metadata.label(linkerd::APP_LABEL)
    }

    fn created_by(&self) -> Option<&str> {
        self.metadata.annotation(linkerd::CREATED_BY_ANNOTATION)
    }
}

pub trait DeploymentExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;
    /// Version advertised through the `app.kubernetes.io/version` label.
    fn version(&self) -> Option<&str>;
}

impl DeploymentExt for appsv1::Deployment {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::with_namespace(name, namespace);
        Self {
            metadata,
            ..default()
        }
    }

    fn version(&self) -> Option<&str> {
        self.metadata.label(linkerd::VERSION_LABEL)
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}

#[cfg(test)]
mod tests;
