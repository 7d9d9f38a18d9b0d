use assert_cmd::Command;
use std::path::Path;
use tempfile::tempdir;

const POLICYCTL: &str = "policyctl";

fn policyctl(database: &Path) -> Command {
    let mut cmd = Command::cargo_bin(POLICYCTL).unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("POLICYCTL_DEFAULT_CONFIGURATION")
        .arg("--database")
        .arg(database)
        .arg("--log-format=text");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn get_update_and_reset() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("alerting.db");

    let out = stdout_of(policyctl(&db).args(["get", "--output", "json"]));
    insta::assert_snapshot!(out.trim_end(), @r###"{"org_id":1,"provenance":"none","route":{"receiver":"grafana-default-email"}}"###);

    let tree = dir.path().join("tree.yaml");
    std::fs::write(
        &tree,
        "receiver: grafana-default-email\ngroup_by: [alertname]\nroutes:\n  - receiver: grafana-default-email\n    repeat_interval: 1h\n",
    )
    .unwrap();

    stdout_of(policyctl(&db).args(["update", "--org-id", "2", "--file"]).arg(&tree));

    let out = stdout_of(policyctl(&db).args(["get", "--org-id", "2", "-o", "json"]));
    insta::assert_snapshot!(out.trim_end(), @r###"{"org_id":2,"provenance":"api","route":{"receiver":"grafana-default-email","group_by":["alertname"],"routes":[{"receiver":"grafana-default-email","repeat_interval":"1h"}]}}"###);

    let out = stdout_of(policyctl(&db).args(["reset", "--org-id", "2", "-o", "json"]));
    insta::assert_snapshot!(out.trim_end(), @r###"{"org_id":2,"provenance":"none","route":{"receiver":"grafana-default-email"}}"###);
}

#[test]
fn update_from_stdin() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("alerting.db");

    policyctl(&db)
        .args(["update", "--file", "-", "--provenance", "file"])
        .write_stdin(r#"{"receiver": "grafana-default-email", "group_wait": "30s"}"#)
        .assert()
        .success();

    let out = stdout_of(policyctl(&db).args(["get", "-o", "json"]));
    assert!(out.contains(r#""provenance":"file""#), "{out}");
    assert!(out.contains(r#""group_wait":"30s""#), "{out}");
}

#[test]
fn invalid_update_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("alerting.db");

    let output = policyctl(&db)
        .args(["update", "--file", "-"])
        .write_stdin("receiver: grafana-default-emial\n")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#"receiver "grafana-default-emial" does not exist; did you mean "grafana-default-email"?"#),
        "{stderr}"
    );

    // Nothing was written.
    let out = stdout_of(policyctl(&db).args(["get", "-o", "json"]));
    assert!(out.contains(r#""provenance":"none""#), "{out}");
}

#[test]
fn provision_directory() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("alerting.db");
    let provisioning = dir.path().join("provisioning");
    std::fs::create_dir(&provisioning).unwrap();

    std::fs::write(
        provisioning.join("policies.yaml"),
        "apiVersion: 1\npolicies:\n  - orgId: 5\n    receiver: grafana-default-email\n    group_by: ['...']\n",
    )
    .unwrap();

    let out = stdout_of(policyctl(&db).args(["provision", "-o", "json"]).arg(&provisioning));
    insta::assert_snapshot!(out.trim_end(), @r###"{"reset":[],"updated":[5]}"###);

    let out = stdout_of(policyctl(&db).args(["get", "--org-id", "5", "-o", "json"]));
    assert!(out.contains(r#""provenance":"file""#), "{out}");
}
