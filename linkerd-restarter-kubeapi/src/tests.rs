use time::macros::datetime;

use super::*;

const RESTARTED_AT: &str = "/spec/template/metadata/annotations/kubectl.kubernetes.io~1restartedAt";

#[test]
fn pod_ref_displays_as_kubectl_resource() {
    let pod = PodRef::new("web-5c7f9d-x2k8p", "0b6f3c1e");
    assert_eq!(pod.to_string(), "pod/web-5c7f9d-x2k8p");
}

#[test]
fn not_found_message() {
    let err = ClusterError::NotFound {
        kind: "deployment",
        namespace: "linkerd".to_string(),
        name: "linkerd-proxy-injector".to_string(),
    };
    assert_eq!(
        err.to_string(),
        r#"deployment "linkerd/linkerd-proxy-injector" not found"#
    );
}

#[test]
fn timeout_message() {
    let err = ClusterError::Timeout(Duration::from_secs(600));
    assert_eq!(err.to_string(), "timed out after 600s");
}

#[test]
fn restart_patch_stamps_pod_template() {
    let patch = restart_patch(datetime!(2024-05-01 12:30:00 UTC)).unwrap();
    assert_eq!(
        patch.pointer(RESTARTED_AT).and_then(|value| value.as_str()),
        Some("2024-05-01T12:30:00Z")
    );
    // Only the template annotation is touched.
    assert_eq!(patch["spec"].as_object().unwrap().len(), 1);
    assert_eq!(patch["spec"]["template"].as_object().unwrap().len(), 1);
}

#[test]
fn restart_timestamp_is_rfc3339() {
    let now = OffsetDateTime::now_utc();
    let patch = restart_patch(now).unwrap();
    let stamp = patch.pointer(RESTARTED_AT).and_then(|value| value.as_str()).unwrap();
    let parsed = OffsetDateTime::parse(stamp, &Rfc3339).unwrap();
    assert_eq!(parsed, now);
}
