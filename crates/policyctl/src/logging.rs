use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Arguments which configure the logging of policyctl.
#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Default level of logs written to stderr.
    /// RUST_LOG directives, if set, take precedence.
    #[clap(long = "log-level", global = true, value_enum, default_value = "warn")]
    pub level: LogLevel,
    /// Format of logs written to stderr.
    /// Defaults to `color` if stderr is a terminal, and `text` otherwise.
    #[clap(long = "log-format", global = true, value_enum)]
    pub format: Option<LogFormat>,
}

#[derive(Debug, Copy, Clone, PartialEq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

#[derive(Debug, Copy, Clone, PartialEq, clap::ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
    Color,
}

impl LogLevel {
    fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Install a global tracing subscriber which writes to stderr.
/// Panics if a global subscriber is already installed.
pub fn init_logging(args: &LogArgs) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(args.level.filter().into())
        .from_env_lossy();

    let format = args.format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stderr) {
            LogFormat::Color
        } else {
            LogFormat::Text
        }
    });

    let builder = tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().flatten_event(true).init(),
        LogFormat::Text => builder.with_ansi(false).init(),
        LogFormat::Color => builder.with_ansi(true).init(),
    }
}
