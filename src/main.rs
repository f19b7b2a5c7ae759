use std::io::Write;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use obrc_stats::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::from_args();
    let report = obrc_stats::run(&config)?;

    // One write for the whole report.
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&report)
        .and_then(|()| stdout.flush())
        .context("couldn't write report to stdout")?;
    Ok(())
}
