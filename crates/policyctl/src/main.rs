use anyhow::Context;
use clap::Parser;

fn main() -> Result<(), anyhow::Error> {
    let cli = policyctl::Cli::parse();
    policyctl::init_logging(&cli.log_args);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .context("failed to start runtime")?;

    let handle = runtime.spawn(async move { cli.run().await });
    let result = runtime.block_on(handle);

    // An incomplete spawned future could otherwise block shutdown indefinitely.
    runtime.shutdown_background();

    result.context("policyctl task failed")?
}
