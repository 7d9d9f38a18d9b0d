//! Provisioning of notification policies from files.
//!
//! A provisioning file is a YAML (or JSON) document such as:
//!
//! ```yaml
//! apiVersion: 1
//! policies:
//!   - orgId: 1
//!     receiver: ops-pager
//!     group_by: [alertname]
//!     routes:
//!       - receiver: ops-email
//!         matchers: ['severity="warning"']
//! resetPolicies: [2]
//! ```
//!
//! Each policy replaces the policy tree of its organization, which is then
//! recorded as having Provenance::File. Each organization of `resetPolicies`
//! is restored to the default policy tree.

use crate::store::{DocumentStore, ProvenanceStore, TransactionManager};
use crate::NotificationPolicyService;
use anyhow::Context;
use models::{OrgId, Provenance, Route};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The only supported `apiVersion` of provisioning files.
pub const API_VERSION: i64 = 1;

const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyFile {
    /// Path from which this file was loaded.
    #[serde(skip)]
    pub path: PathBuf,

    pub api_version: i64,
    /// Policy trees to provision.
    #[serde(default)]
    pub policies: Vec<Policy>,
    /// Organizations whose policy trees are reset to the default.
    #[serde(default)]
    pub reset_policies: Vec<OrgId>,
}

/// A policy tree to provision into an organization.
#[derive(Deserialize, Debug)]
pub struct Policy {
    #[serde(rename = "orgId", default = "default_org_id")]
    pub org_id: OrgId,
    #[serde(flatten)]
    pub route: Route,
}

fn default_org_id() -> OrgId {
    OrgId::new(1)
}

/// Outcome of applying provisioning files.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    pub updated: Vec<OrgId>,
    pub reset: Vec<OrgId>,
}

/// Parse a provisioning file from its content.
pub fn parse(path: &Path, content: &str) -> anyhow::Result<PolicyFile> {
    let mut file: PolicyFile = serde_yaml::from_str(content)
        .with_context(|| format!("parsing provisioning file {}", path.display()))?;

    if file.api_version != API_VERSION {
        anyhow::bail!(
            "provisioning file {} has unsupported apiVersion {} (expected {API_VERSION})",
            path.display(),
            file.api_version,
        );
    }
    file.path = path.to_owned();

    Ok(file)
}

/// Load provisioning files from `path`, which is either a file
/// or a directory of `*.yaml`, `*.yml`, and `*.json` files.
/// Files of a directory are returned in the sorted order of their paths.
pub fn load(path: &Path) -> anyhow::Result<Vec<PolicyFile>> {
    let metadata =
        std::fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;

    let paths = if metadata.is_dir() {
        let mut paths = Vec::new();

        for entry in
            std::fs::read_dir(path).with_context(|| format!("listing {}", path.display()))?
        {
            let entry_path = entry?.path();

            let provisionable = entry_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| EXTENSIONS.contains(&ext))
                .unwrap_or_default();

            if provisionable && entry_path.is_file() {
                paths.push(entry_path);
            }
        }
        paths.sort();
        paths
    } else {
        vec![path.to_owned()]
    };

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        files.push(parse(&path, &content)?);
    }
    tracing::debug!(count = files.len(), "loaded provisioning files");

    Ok(files)
}

/// Apply provisioning files in order. All policies of a file are applied
/// before its resets. Application stops at the first failure.
pub async fn apply<X, D, P>(
    service: &NotificationPolicyService<X, D, P>,
    files: Vec<PolicyFile>,
) -> anyhow::Result<Applied>
where
    X: TransactionManager,
    D: DocumentStore<X::Txn>,
    P: ProvenanceStore<X::Txn>,
{
    let mut applied = Applied::default();

    for PolicyFile {
        path,
        policies,
        reset_policies,
        ..
    } in files
    {
        for Policy { org_id, route } in policies {
            service
                .update_policy_tree(org_id, route, Provenance::File)
                .await
                .with_context(|| {
                    format!(
                        "provisioning policy tree of organization {org_id} from {}",
                        path.display()
                    )
                })?;
            applied.updated.push(org_id);
        }
        for org_id in reset_policies {
            service.reset_policy_tree(org_id).await.with_context(|| {
                format!(
                    "resetting policy tree of organization {org_id} from {}",
                    path.display()
                )
            })?;
            applied.reset.push(org_id);
        }
        tracing::info!(path = %path.display(), "applied provisioning file");
    }

    Ok(applied)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_policies_and_resets() {
        let file = parse(
            Path::new("policies.yaml"),
            r#"
apiVersion: 1
policies:
  - receiver: ops-pager
    group_by: [alertname]
    repeat_interval: 4h
  - orgId: 3
    receiver: ops-email
    routes:
      - receiver: ops-pager
        matchers: ['severity="critical"']
        continue: true
resetPolicies: [2]
"#,
        )
        .unwrap();

        assert_eq!(file.path, Path::new("policies.yaml"));
        assert_eq!(file.reset_policies, vec![OrgId::new(2)]);

        let orgs: Vec<_> = file.policies.iter().map(|p| p.org_id).collect();
        assert_eq!(orgs, vec![OrgId::new(1), OrgId::new(3)]);

        let first = &file.policies[0].route;
        assert_eq!(first.receiver.as_deref(), Some("ops-pager"));
        assert_eq!(
            first.repeat_interval,
            Some(std::time::Duration::from_secs(4 * 3600))
        );
        // `orgId` is consumed by the Policy, and isn't retained by its Route.
        assert!(first.extra.is_empty());

        let child = &file.policies[1].route.routes[0];
        assert!(child.continue_);
        assert_eq!(child.matchers, vec![r#"severity="critical""#.to_string()]);
    }

    #[test]
    fn test_parse_json() {
        let file = parse(
            Path::new("policies.json"),
            r#"{"apiVersion": 1, "policies": [{"orgId": 4, "receiver": "r"}]}"#,
        )
        .unwrap();

        assert_eq!(file.policies[0].org_id, OrgId::new(4));
        assert!(file.reset_policies.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let err = parse(Path::new("v2.yaml"), "apiVersion: 2\n").unwrap_err();
        insta::assert_snapshot!(err, @"provisioning file v2.yaml has unsupported apiVersion 2 (expected 1)");

        let err = parse(Path::new("typo.yaml"), "apiVersion: 1\npolicy: []\n").unwrap_err();
        assert_eq!(err.to_string(), "parsing provisioning file typo.yaml");
    }
}
