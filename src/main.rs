//! cachepulse CLI entry point

use anyhow::{Context, Result};
use cachepulse::config::toml::{merge_cli_with_config, parse_toml_file};
use cachepulse::config::{cli::Cli, validator, Config, RunConfig};
use cachepulse::coordinator::Runner;
use cachepulse::observability;
use cachepulse::output::{json, text};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    observability::init_tracing(cli.verbose);

    let config = parse_toml_file(&cli.config)?;
    let config = merge_cli_with_config(&cli, config);

    validator::validate_config(&config).context("Configuration validation failed")?;
    let run_config = config.run_config().context("Invalid runtime configuration")?;

    if !cli.json {
        println!("cachepulse v{}", env!("CARGO_PKG_VERSION"));
        println!();
        print_configuration(&config, &run_config);
    }

    if cli.dry_run {
        if !cli.json {
            println!();
            println!("Dry run mode - configuration validated successfully");
        }
        return Ok(());
    }

    let scenario = config.scenario().context("Failed to build scenario")?;
    let targets = config.targets().context("Failed to build cache targets")?;

    let mut runner = Runner::new(scenario, targets, run_config);
    let summary = runner.start().context("Run failed")?;

    if cli.json {
        println!("{}", json::to_json(&summary)?);
    } else {
        println!();
        text::print_results(&summary, config.report.outcomes.as_deref());
    }

    Ok(())
}

fn print_configuration(config: &Config, run_config: &RunConfig) {
    println!("Configuration:");
    println!("  Workload: {}", config.workload);
    println!("  Targets:");
    for target in &config.targets {
        println!("    {}", target);
    }
    println!("  Workers: {}", config.workers);
    println!("  Run: {}", run_config);
}
