use crate::{CliContext, Service};
use anyhow::Context;
use models::{OrgId, Provenance, Route};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args)]
pub struct OrgArgs {
    /// Organization which owns the alerting configuration.
    #[clap(long, default_value = "1")]
    pub org_id: OrgId,
}

#[derive(Debug, clap::Args)]
pub struct Get {
    #[clap(flatten)]
    org: OrgArgs,
}

#[derive(Debug, clap::Args)]
pub struct Update {
    #[clap(flatten)]
    org: OrgArgs,
    /// Path of a YAML or JSON policy tree, or `-` to read it from stdin.
    #[clap(long)]
    file: PathBuf,
    /// Origin of the policy tree to record.
    #[clap(long, default_value = "api")]
    provenance: Provenance,
}

#[derive(Debug, clap::Args)]
pub struct Reset {
    #[clap(flatten)]
    org: OrgArgs,
}

#[derive(Debug, clap::Args)]
pub struct Provision {
    /// Provisioning file, or directory of provisioning files, to apply.
    path: PathBuf,
}

/// Policy tree of an organization, as output by policyctl.
#[derive(Debug, serde::Serialize)]
pub struct PolicyTree {
    pub org_id: OrgId,
    pub provenance: String,
    pub route: Route,
}

impl PolicyTree {
    pub fn new(org_id: OrgId, route: Route, provenance: Provenance) -> Self {
        Self {
            org_id,
            provenance: provenance.to_string(),
            route,
        }
    }
}

impl Get {
    pub async fn run(&self, ctx: &CliContext, service: &Service) -> anyhow::Result<()> {
        let org_id = self.org.org_id;
        let (route, provenance) = service
            .get_policy_tree(org_id)
            .await
            .with_context(|| format!("fetching policy tree of organization {org_id}"))?;

        ctx.output.print(&PolicyTree::new(org_id, route, provenance))
    }
}

impl Update {
    pub async fn run(&self, ctx: &CliContext, service: &Service) -> anyhow::Result<()> {
        let org_id = self.org.org_id;
        let route = read_route(&self.file)?;

        service
            .update_policy_tree(org_id, route.clone(), self.provenance)
            .await
            .with_context(|| format!("updating policy tree of organization {org_id}"))?;

        ctx.output
            .print(&PolicyTree::new(org_id, route, self.provenance))
    }
}

impl Reset {
    pub async fn run(&self, ctx: &CliContext, service: &Service) -> anyhow::Result<()> {
        let org_id = self.org.org_id;
        let route = service
            .reset_policy_tree(org_id)
            .await
            .with_context(|| format!("resetting policy tree of organization {org_id}"))?;

        ctx.output
            .print(&PolicyTree::new(org_id, route, Provenance::None))
    }
}

impl Provision {
    pub async fn run(&self, ctx: &CliContext, service: &Service) -> anyhow::Result<()> {
        let files = provisioning::files::load(&self.path)?;
        let applied = provisioning::files::apply(service, files).await?;

        ctx.output.print(&serde_json::json!({
            "updated": applied.updated,
            "reset": applied.reset,
        }))
    }
}

fn read_route(path: &Path) -> anyhow::Result<Route> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("reading policy tree from stdin")?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading policy tree {}", path.display()))?
    };

    serde_yaml::from_str(&content)
        .with_context(|| format!("parsing policy tree {}", path.display()))
}
