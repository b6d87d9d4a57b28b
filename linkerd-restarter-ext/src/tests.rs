use super::*;

#[test]
fn well_known_names() {
    assert_eq!(linkerd::PROXY_INJECTOR, "linkerd-proxy-injector");
    assert_eq!(linkerd::PROXY_INJECTOR_COMPONENT, "linkerd/proxy-injector");
    assert_eq!(
        linkerd::created_by("stable-2.14.10"),
        "linkerd/proxy-injector stable-2.14.10"
    );
}

#[test]
fn object_meta_builders() {
    let meta = metav1::ObjectMeta::with_namespace("web-7d9c", "default")
        .with_label("app", "web")
        .with_annotation("linkerd.io/created-by", "linkerd/proxy-injector v2.3.0");

    assert_eq!(meta.name.as_deref(), Some("web-7d9c"));
    assert_eq!(meta.namespace.as_deref(), Some("default"));
    assert_eq!(meta.label("app"), Some("web"));
    assert_eq!(meta.label("tier"), None);
    assert_eq!(
        meta.annotation("linkerd.io/created-by"),
        Some("linkerd/proxy-injector v2.3.0")
    );
}

#[test]
fn missing_maps_read_as_absent() {
    let meta = metav1::ObjectMeta::new("bare");
    assert_eq!(meta.label("app"), None);
    assert_eq!(meta.annotation("linkerd.io/created-by"), None);
}

#[test]
fn pod_accessors() {
    let mut pod = corev1::Pod::new("web-7d9c", "default");
    assert_eq!(pod.app(), None);
    assert_eq!(pod.created_by(), None);

    pod.metadata = pod
        .metadata
        .with_label(linkerd::APP_LABEL, "web")
        .with_annotation(linkerd::CREATED_BY_ANNOTATION, linkerd::created_by("v2.1.0"));
    assert_eq!(pod.app(), Some("web"));
    assert_eq!(pod.created_by(), Some("linkerd/proxy-injector v2.1.0"));
}

#[test]
fn deployment_version() {
    let mut deployment = appsv1::Deployment::new(linkerd::PROXY_INJECTOR, "linkerd");
    assert_eq!(deployment.version(), None);

    deployment.metadata = deployment
        .metadata
        .with_label(linkerd::VERSION_LABEL, "v2.3.0");
    assert_eq!(deployment.version(), Some("v2.3.0"));
}
