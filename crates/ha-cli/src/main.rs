use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ha_cli::commands::aggregate;
use ha_cli::{Cli, Config, failure};

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(cli);
    tracing::debug!(?config, "loaded configuration");

    aggregate::run(&config, cli.sections())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\n{}\n", failure::render(&err));
            ExitCode::FAILURE
        }
    }
}
