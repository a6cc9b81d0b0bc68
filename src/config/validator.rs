//! Configuration validation
//!
//! Runs every check a run would hit, without starting one. Used by `--dry-run`
//! and before any run from a config file.

use super::*;
use anyhow::{Context, Result};

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workload(&config.workload)?;
    validate_targets(config)?;
    validate_workers(&config.workers)?;
    validate_runtime(config)?;
    Ok(())
}

/// Validate workload configuration
pub fn validate_workload(workload: &WorkloadConfig) -> Result<()> {
    if workload.operations.is_empty() {
        anyhow::bail!("workload '{}' must list at least one operation", workload.name);
    }
    if workload.key_length == 0 {
        anyhow::bail!("key_length must be at least 1");
    }

    for (i, op) in workload.operations.iter().enumerate() {
        crate::distribution::build(&op.distribution)
            .with_context(|| format!("Operation {} ({})", i, op.kind))?;
    }

    // Builds the weight table and binds every operation
    let candidate = Config {
        workload: workload.clone(),
        targets: Vec::new(),
        workers: WorkerConfig::default(),
        runtime: RuntimeConfig::default(),
        report: ReportConfig::default(),
    };
    candidate
        .scenario()
        .with_context(|| format!("Invalid workload '{}'", workload.name))?;

    Ok(())
}

/// Validate target configuration
pub fn validate_targets(config: &Config) -> Result<()> {
    for (i, target) in config.targets.iter().enumerate() {
        if target.name.trim().is_empty() {
            anyhow::bail!("Target {}: name must not be empty", i);
        }
    }
    config.targets().context("Invalid targets")?;
    Ok(())
}

/// Validate worker configuration
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    if workers.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }
    Ok(())
}

/// Validate termination and timing
pub fn validate_runtime(config: &Config) -> Result<()> {
    config.run_config().context("Invalid runtime configuration")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        ::toml::from_str(toml).unwrap()
    }

    const VALID: &str = r#"
        [workload]
        [[workload.operations]]
        kind = "get"
        weight = 0.9

        [[targets]]
        name = "a"

        [workers]
        threads = 2

        [runtime]
        iterations = 100
    "#;

    #[test]
    fn test_valid_config() {
        validate_config(&parse(VALID)).unwrap();
    }

    #[test]
    fn test_weights_over_one() {
        let cfg = parse(
            r#"
            [workload]
            [[workload.operations]]
            kind = "get"
            weight = 0.9
            [[workload.operations]]
            kind = "put"
            weight = 0.2
            [[targets]]
            name = "a"
            [runtime]
            iterations = 1
        "#,
        );
        let err = validate_config(&cfg).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("must sum to at most 1.0"), "{}", chain);
    }

    #[test]
    fn test_missing_targets() {
        let mut cfg = parse(VALID);
        cfg.targets.clear();
        let chain = format!("{:#}", validate_config(&cfg).unwrap_err());
        assert!(chain.contains("at least one cache target"), "{}", chain);
    }

    #[test]
    fn test_both_terminations() {
        let mut cfg = parse(VALID);
        cfg.runtime.duration = Some("10s".to_string());
        let chain = format!("{:#}", validate_config(&cfg).unwrap_err());
        assert!(chain.contains("both an iteration count and a duration"), "{}", chain);
    }

    #[test]
    fn test_invalid_distribution() {
        let cfg = parse(
            r#"
            [workload]
            [[workload.operations]]
            kind = "get"
            distribution = { kind = "gaussian", lower_bound = 10, upper_bound = 10, spread = 1.0 }
            [[targets]]
            name = "a"
            [runtime]
            iterations = 1
        "#,
        );
        let chain = format!("{:#}", validate_config(&cfg).unwrap_err());
        assert!(chain.contains("Operation 0 (get)"), "{}", chain);
    }

    #[test]
    fn test_zero_bulk_batch_size() {
        let mut cfg = parse(VALID);
        cfg.workload.operations[0].kind = OperationKind::RemoveAll;
        cfg.workload.bulk_batch_size = 0;
        let chain = format!("{:#}", validate_config(&cfg).unwrap_err());
        assert!(chain.contains("batch size of at least 1"), "{}", chain);
    }

    #[test]
    fn test_zero_key_length() {
        let mut cfg = parse(VALID);
        cfg.workload.key_length = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
