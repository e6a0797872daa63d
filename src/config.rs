use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_INPUT: &str = "providers.csv";
pub const DEFAULT_OUTPUT: &str = "output";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Optional settings read from `.provider-export/config.toml`.
///
/// Every key may be omitted; missing keys fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Providers CSV to read.
    pub input: Option<PathBuf>,
    /// Existing directory that receives `<name>.json` files.
    pub output: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `provider_export=debug`.
    pub log_level: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_level: String,
}

/// Values given on the command line; these win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Merge CLI overrides, file values and defaults, in that order of precedence.
    pub fn resolve(self, overrides: Overrides) -> Settings {
        Settings {
            input: overrides
                .input
                .or(self.input)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output: overrides
                .output
                .or(self.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            log_level: overrides
                .log_level
                .or(self.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.provider-export/config.toml`
/// 3. `~/.config/provider-export/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = base_dir.join(".provider-export").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("provider-export")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
