use anyhow::{Context, Result};
use clap::Parser;

use loadforge_burst::cli::Args;
use loadforge_burst::{report, run_load_test, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();
    let config = args.run_config().context("invalid run configuration")?;

    let summary = run_load_test(&config)
        .await
        .with_context(|| format!("load run against {} failed", config.target))?;

    report::print_summary(&summary);
    if args.breakdown {
        report::print_breakdown(&summary);
    }

    Ok(())
}
