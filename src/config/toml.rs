//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(threads) = cli.threads {
        config.workers.threads = threads;
    }

    // A termination given on the command line replaces the configured one
    if let Some(iterations) = cli.iterations {
        config.runtime.iterations = Some(iterations);
        config.runtime.duration = None;
    } else if let Some(ref duration) = cli.duration {
        config.runtime.duration = Some(duration.clone());
        config.runtime.iterations = None;
    }

    if let Some(ref timeout) = cli.timeout {
        config.runtime.timeout = timeout.clone();
    }
    if let Some(seed) = cli.seed {
        config.runtime.seed = Some(seed);
    }

    config
}
