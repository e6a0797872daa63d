//! `provider-export` — turn a providers CSV into per-provider JSON declarations.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config and merge it with the CLI flags ([`config::load_config`]).
//! 3. Initialize logging (`tracing`, stderr).
//! 4. Convert every CSV row into `<output>/<name>.json` ([`converter::convert`]).
//! 5. Render the run summary ([`report`]).
//! 6. Exit `0`, or `1` on the first error (files already written are kept).

mod cli;
mod config;
mod converter;
mod error;
mod models;
mod reader;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&std::env::current_dir()?, cli.config.as_deref())?;
    let settings = config.resolve(cli.overrides());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?settings, "resolved settings");

    let summary = converter::convert(&settings.input, &settings.output)?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&summary, cli.verbose, cli.quiet)?,
        ReportFormat::Json => println!("{}", report::json::render(&summary)?),
    }

    Ok(())
}
