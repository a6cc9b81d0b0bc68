//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// cachepulse - load generator for cache implementations
#[derive(Parser, Debug)]
#[command(name = "cachepulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long, env = "CACHEPULSE_CONFIG")]
    pub config: PathBuf,

    /// Number of worker threads (overrides the config file)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Total iterations across all workers (replaces the configured termination)
    #[arg(short = 'n', long, conflicts_with = "duration")]
    pub iterations: Option<u64>,

    /// Run duration, e.g. 30s, 5m (replaces the configured termination)
    #[arg(short = 'd', long)]
    pub duration: Option<String>,

    /// Run timeout, e.g. 10m
    #[arg(long)]
    pub timeout: Option<String>,

    /// Seed for operation selection and key sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print results as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Dry run - validate configuration without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }
        if self.iterations == Some(0) {
            anyhow::bail!("iterations must be at least 1");
        }
        Ok(())
    }
}
