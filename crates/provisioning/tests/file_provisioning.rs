use models::{OrgId, Provenance, ResourceKind, Route};
use provisioning::files::{self, Applied};
use provisioning::{MemoryStore, NotificationPolicyService, Settings};

const POLICIES: &str = r#"
apiVersion: 1
policies:
  - receiver: grafana-default-email
    group_by: [alertname]
    routes:
      - receiver: grafana-default-email
        matchers: ['team="storage"']
        group_wait: 1m
  - orgId: 3
    receiver: grafana-default-email
"#;

const RESETS: &str = r#"{"apiVersion": 1, "resetPolicies": [2]}"#;

#[tokio::test]
async fn test_provision_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("20-resets.json"), RESETS).unwrap();
    std::fs::write(dir.path().join("10-policies.yaml"), POLICIES).unwrap();
    std::fs::write(dir.path().join("README.md"), "not provisioned").unwrap();

    let loaded = files::load(dir.path()).unwrap();
    let names: Vec<_> = loaded
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["10-policies.yaml", "20-resets.json"]);

    let store = MemoryStore::new();
    let service = NotificationPolicyService::from_store(store.clone(), Settings::default());

    // Organization 2 was previously edited through the API.
    let mut edited = Route::new(models::DEFAULT_RECEIVER);
    edited.group_by = Some(vec!["cluster".to_string()]);
    service
        .update_policy_tree(OrgId::new(2), edited, Provenance::Api)
        .await
        .unwrap();

    let applied = files::apply(&service, loaded).await.unwrap();
    assert_eq!(
        applied,
        Applied {
            updated: vec![OrgId::new(1), OrgId::new(3)],
            reset: vec![OrgId::new(2)],
        }
    );

    let (route, provenance) = service.get_policy_tree(OrgId::new(1)).await.unwrap();
    assert_eq!(provenance, Provenance::File);
    assert_eq!(route.routes.len(), 1);
    assert_eq!(
        route.routes[0].group_wait,
        Some(std::time::Duration::from_secs(60))
    );

    assert_eq!(
        store.provenance(ResourceKind::PolicyTree, OrgId::new(3)),
        Provenance::File
    );
    assert_eq!(
        service.get_policy_tree(OrgId::new(2)).await.unwrap(),
        (Route::new(models::DEFAULT_RECEIVER), Provenance::None)
    );
}

#[tokio::test]
async fn test_provision_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policies.yml");
    std::fs::write(&path, POLICIES).unwrap();

    let loaded = files::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].policies.len(), 2);
}

#[tokio::test]
async fn test_invalid_policy_stops_provisioning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policies.yaml");
    std::fs::write(
        &path,
        "apiVersion: 1\npolicies:\n  - receiver: nobody\n  - orgId: 2\n    receiver: grafana-default-email\n",
    )
    .unwrap();

    let store = MemoryStore::new();
    let service = NotificationPolicyService::from_store(store.clone(), Settings::default());

    let err = files::apply(&service, files::load(&path).unwrap())
        .await
        .unwrap_err();

    let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
    assert_eq!(
        chain[0],
        format!(
            "provisioning policy tree of organization 1 from {}",
            path.display()
        )
    );
    assert_eq!(
        chain[1],
        "invalid notification policy tree:\n#/receiver: receiver \"nobody\" does not exist"
    );

    // Later policies were not applied.
    assert_eq!(store.config(OrgId::new(2)), None);
}

#[test]
fn test_load_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = files::load(&dir.path().join("missing")).unwrap_err();
    assert!(err.to_string().starts_with("reading "));
}
