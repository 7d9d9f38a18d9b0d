use anyhow::Context;
use provisioning::{NotificationPolicyService, Settings, SqliteStore};
use std::path::PathBuf;
use std::time::Duration;

mod logging;
mod output;
mod policy;

pub use logging::{init_logging, LogArgs, LogFormat, LogLevel};
pub use output::{Output, OutputType};

type Service = NotificationPolicyService<SqliteStore, SqliteStore, SqliteStore>;

/// A command-line tool for provisioning the notification policies
/// of alerting configurations.
#[derive(Debug, clap::Parser)]
#[clap(author, about, version)]
pub struct Cli {
    /// Path of the SQLite database of alerting configurations.
    /// It's created if it doesn't exist.
    #[clap(long, global = true, env = "POLICYCTL_DATABASE", default_value = "alerting.db")]
    database: PathBuf,
    /// Path of the alerting configuration of organizations which have none,
    /// and from which reset policy trees are taken.
    /// Defaults to a configuration having a single email receiver.
    #[clap(long, global = true, env = "POLICYCTL_DEFAULT_CONFIGURATION")]
    default_configuration: Option<PathBuf>,
    /// Bound on the duration of each database operation, such as `5s`.
    #[clap(long, global = true, value_parser = humantime::parse_duration)]
    store_timeout: Option<Duration>,

    #[clap(subcommand)]
    cmd: Command,

    #[clap(flatten)]
    output: Output,

    #[clap(flatten)]
    pub log_args: LogArgs,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Print the notification policy tree of an organization, and its provenance.
    Get(policy::Get),
    /// Replace the notification policy tree of an organization.
    ///
    /// The policy tree must reference only receivers and mute time intervals
    /// of the organization's configuration. The update fails without effect
    /// if the configuration is modified while it's applied.
    Update(policy::Update),
    /// Restore the notification policy tree of an organization to the default.
    Reset(policy::Reset),
    /// Apply a provisioning file, or a directory of provisioning files.
    Provision(policy::Provision),
}

#[derive(Debug)]
pub struct CliContext {
    output: Output,
}

impl Cli {
    pub async fn run(&self) -> anyhow::Result<()> {
        let service = self.service()?;
        let ctx = CliContext {
            output: self.output.clone(),
        };

        match &self.cmd {
            Command::Get(get) => get.run(&ctx, &service).await,
            Command::Update(update) => update.run(&ctx, &service).await,
            Command::Reset(reset) => reset.run(&ctx, &service).await,
            Command::Provision(provision) => provision.run(&ctx, &service).await,
        }
    }

    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.default_configuration {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading default configuration {}", path.display()))?;
                Settings::with_default_configuration(&raw)
                    .with_context(|| format!("decoding default configuration {}", path.display()))?
            }
            None => Settings::default(),
        };
        settings.store_timeout = self.store_timeout;

        Ok(settings)
    }

    fn service(&self) -> anyhow::Result<Service> {
        let settings = self.settings()?;
        let store = SqliteStore::open(&self.database)
            .with_context(|| format!("opening database {}", self.database.display()))?;

        tracing::debug!(database = %self.database.display(), "opened database");
        Ok(NotificationPolicyService::from_store(store, settings))
    }
}
