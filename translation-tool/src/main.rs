use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use translation_tool::{cli::Cli, config::Config, shell};

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut input = io::stdin().lock();
    let mut out = io::stdout();

    let config = Config::resolve(cli, &mut input, &mut out).context("failed to read startup menu")?;
    let handler = shell::open(&config, &mut out).context("failed to open dictionary")?;
    shell::run_session(handler, config.workers, input, out).context("translation session failed")?;

    Ok(())
}
