use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "provider-export",
    about = "Convert a providers CSV into one JSON declaration per provider",
    version
)]
pub struct Cli {
    /// Providers CSV (name,tosURL,tosSelector,pcyURL,pcySelector) [default: providers.csv]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Existing directory to write <name>.json files into [default: output]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Config file [default: ./.provider-export/config.toml, fallback ~/.config/provider-export/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run summary format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Log filter, e.g. `info` or `debug` (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// List every exported provider
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            input: self.input.clone(),
            output: self.output.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
