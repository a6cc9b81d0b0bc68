//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! The file format is the raw, serde-facing [`Config`]. Nothing in it is
//! trusted: [`Config::run_config`], [`Config::scenario`] and
//! [`Config::targets`] turn it into the validated library values a
//! [`Runner`](crate::coordinator::Runner) takes.
//!
//! ```toml
//! [workload]
//! name = "read-heavy"
//! key_length = 10
//! value_length = 128
//!
//! [[workload.operations]]
//! kind = "get"
//! weight = 0.8
//! distribution = { kind = "gaussian", lower_bound = 0, upper_bound = 10000, spread = 1000.0 }
//!
//! [[workload.operations]]
//! kind = "put"
//! weight = 0.2
//!
//! [[targets]]
//! name = "primary"
//!
//! [workers]
//! threads = 4
//!
//! [runtime]
//! duration = "30s"
//! warmup = "5s"
//! timeout = "5m"
//!
//! [report]
//! outcomes = ["GET", "MISS", "PUT"]
//! ```

pub mod cli;
pub mod toml;
pub mod validator;
pub mod workload;

use crate::distribution::randomizer::DEFAULT_SEED;
use crate::error::ConfigError;
use crate::generator::bytes::ByteArrayGenerator;
use crate::generator::string::StringGenerator;
use crate::operation::{Operation, OperationKind, Outcome, DEFAULT_BATCH_SIZE};
use crate::scenario::Scenario;
use crate::target::memory::InMemoryCache;
use crate::target::{Cache, CacheTargets};
use crate::util::time::{format_duration, parse_duration};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use workload::*;

/// Run timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// How long stopping workers get to report back
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Complete test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Operation mix and object shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Scenario name used in reports
    #[serde(default = "default_scenario_name")]
    pub name: String,
    pub operations: Vec<OperationConfig>,
    /// Length of generated string keys
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    /// Length of generated byte-array values
    #[serde(default = "default_value_length")]
    pub value_length: usize,
    /// Keys per cycle for `put_all`, `get_all` and `remove_all`
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,
}

fn default_scenario_name() -> String {
    "default".to_string()
}

fn default_key_length() -> usize {
    10
}

fn default_value_length() -> usize {
    128
}

fn default_bulk_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// One cache target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_threads() -> usize {
    num_cpus::get()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

/// What the text report shows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Outcomes to print; every outcome when unset
    pub outcomes: Option<Vec<Outcome>>,
}

/// Termination, timing and seeding; durations are strings such as `"10s"`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub iterations: Option<u64>,
    pub duration: Option<String>,
    pub warmup: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout: String,
    pub stop_grace: Option<String>,
    pub seed: Option<u64>,
}

fn default_timeout() -> String {
    "5m".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            iterations: None,
            duration: None,
            warmup: None,
            timeout: default_timeout(),
            stop_grace: None,
            seed: None,
        }
    }
}

/// Validated run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    threads: usize,
    termination: Termination,
    warmup: Option<Duration>,
    timeout: Duration,
    stop_grace: Duration,
    seed: u64,
}

impl RunConfig {
    /// # Errors
    ///
    /// - zero threads
    /// - both or neither of `iterations` and `duration`
    /// - a zero iteration count, duration or timeout
    ///
    /// A zero warmup is the same as no warmup.
    pub fn new(
        threads: usize,
        iterations: Option<u64>,
        duration: Option<Duration>,
        warmup: Option<Duration>,
        timeout: Duration,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let termination = match (iterations, duration) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousTermination),
            (None, None) => return Err(ConfigError::MissingTermination),
            (Some(0), None) => return Err(ConfigError::ZeroIterations),
            (Some(n), None) => Termination::Iterations(n),
            (None, Some(d)) if d.is_zero() => return Err(ConfigError::ZeroDuration { field: "duration" }),
            (None, Some(d)) => Termination::Duration(d),
        };

        if timeout.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "timeout" });
        }

        Ok(Self {
            threads,
            termination,
            warmup: warmup.filter(|w| !w.is_zero()),
            timeout,
            stop_grace: DEFAULT_STOP_GRACE.min(timeout),
            seed,
        })
    }

    /// Override the stop grace period; never longer than the timeout
    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace.min(self.timeout);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn warmup(&self) -> Option<Duration> {
        self.warmup
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn stop_grace(&self) -> Duration {
        self.stop_grace
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn duration_field(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn optional_duration(field: &'static str, value: Option<&String>) -> Result<Option<Duration>, ConfigError> {
    value.map(|v| duration_field(field, v)).transpose()
}

impl Config {
    /// Validated run parameters
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let runtime = &self.runtime;
        let duration = optional_duration("duration", runtime.duration.as_ref())?;
        let warmup = optional_duration("warmup", runtime.warmup.as_ref())?;
        let timeout = duration_field("timeout", &runtime.timeout)?;
        let stop_grace = optional_duration("stop_grace", runtime.stop_grace.as_ref())?;

        let config = RunConfig::new(
            self.workers.threads,
            runtime.iterations,
            duration,
            warmup,
            timeout,
            runtime.seed.unwrap_or(DEFAULT_SEED),
        )?;

        Ok(match stop_grace {
            Some(grace) => config.with_stop_grace(grace),
            None => config,
        })
    }

    /// Scenario over fixed-length string keys and byte-array values
    pub fn scenario(&self) -> Result<Scenario<String, Vec<u8>>, ConfigError> {
        let keys = StringGenerator::fixed_length(self.workload.key_length);
        let values = ByteArrayGenerator::fixed_length(self.workload.value_length);

        let operations = self
            .workload
            .operations
            .iter()
            .map(|op| {
                let operation: Operation<String, Vec<u8>> = match op.kind {
                    OperationKind::Get => Operation::get(keys),
                    OperationKind::Remove => Operation::remove(keys),
                    OperationKind::Put => Operation::put(keys, values),
                    OperationKind::PutIfAbsent => Operation::put_if_absent(keys, values),
                    OperationKind::Replace => Operation::replace(keys, values),
                    OperationKind::RemoveForKeyAndValue => Operation::remove_for_key_and_value(keys, values),
                    OperationKind::ReplaceForKeyAndValue => Operation::replace_for_key_and_value(keys, values),
                    OperationKind::PutAll => Operation::put_all(keys, values),
                    OperationKind::GetAll => Operation::get_all(keys),
                    OperationKind::RemoveAll => Operation::remove_all(keys),
                };
                let operation = operation
                    .with_distribution(op.distribution)
                    .with_batch_size(self.workload.bulk_batch_size);
                match op.weight {
                    Some(weight) => operation.with_weight(weight),
                    None => operation,
                }
            })
            .collect();

        Scenario::new(self.workload.name.clone(), operations)
    }

    /// One in-process cache per configured target name
    pub fn targets(&self) -> Result<CacheTargets<String, Vec<u8>>, ConfigError> {
        CacheTargets::new(
            self.targets
                .iter()
                .map(|t| {
                    let cache: Arc<dyn Cache<String, Vec<u8>>> = Arc::new(InMemoryCache::new());
                    (t.name.clone(), cache)
                })
                .collect(),
        )
    }
}

impl fmt::Display for WorkloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' [{}], key_length={}, value_length={}, bulk_batch_size={}",
            self.name,
            self.operations
                .iter()
                .map(|op| op.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.key_length,
            self.value_length,
            self.bulk_batch_size
        )
    }
}

impl fmt::Display for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for WorkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} thread(s)", self.threads)
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} thread(s)", self.termination, self.threads)?;
        if let Some(warmup) = self.warmup {
            write!(f, ", warmup={}", format_duration(warmup))?;
        }
        write!(
            f,
            ", timeout={}, seed={:#x}",
            format_duration(self.timeout),
            self.seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ExecutionMode;

    fn config(runtime: RuntimeConfig) -> Config {
        Config {
            workload: WorkloadConfig {
                name: "test".to_string(),
                operations: vec![OperationConfig {
                    kind: OperationKind::Put,
                    weight: Some(1.0),
                    distribution: DistributionType::default(),
                }],
                key_length: default_key_length(),
                value_length: default_value_length(),
                bulk_batch_size: default_bulk_batch_size(),
            },
            targets: vec![TargetConfig {
                name: "primary".to_string(),
            }],
            workers: WorkerConfig { threads: 2 },
            runtime,
            report: ReportConfig::default(),
        }
    }

    #[test]
    fn test_run_config_termination() {
        let timeout = Duration::from_secs(60);
        assert_eq!(
            RunConfig::new(1, Some(10), Some(Duration::from_secs(1)), None, timeout, 0),
            Err(ConfigError::AmbiguousTermination)
        );
        assert_eq!(
            RunConfig::new(1, None, None, None, timeout, 0),
            Err(ConfigError::MissingTermination)
        );
        assert_eq!(
            RunConfig::new(1, Some(0), None, None, timeout, 0),
            Err(ConfigError::ZeroIterations)
        );
        assert_eq!(
            RunConfig::new(0, Some(1), None, None, timeout, 0),
            Err(ConfigError::ZeroThreads)
        );
        assert_eq!(
            RunConfig::new(1, Some(1), None, None, Duration::ZERO, 0),
            Err(ConfigError::ZeroDuration { field: "timeout" })
        );
    }

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::new(4, None, Some(Duration::from_secs(10)), Some(Duration::ZERO), Duration::from_secs(2), 7)
            .unwrap();
        assert_eq!(config.termination(), Termination::Duration(Duration::from_secs(10)));
        assert_eq!(config.warmup(), None);
        // Grace is capped at the timeout
        assert_eq!(config.stop_grace(), Duration::from_secs(2));
        assert_eq!(config.with_stop_grace(Duration::from_secs(30)).stop_grace(), Duration::from_secs(2));
    }

    #[test]
    fn test_config_run_config() {
        let cfg = config(RuntimeConfig {
            iterations: Some(1000),
            warmup: Some("500ms".to_string()),
            stop_grace: Some("1s".to_string()),
            seed: Some(42),
            ..RuntimeConfig::default()
        });
        let run = cfg.run_config().unwrap();
        assert_eq!(run.threads(), 2);
        assert_eq!(run.termination(), Termination::Iterations(1000));
        assert_eq!(run.warmup(), Some(Duration::from_millis(500)));
        assert_eq!(run.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(run.stop_grace(), Duration::from_secs(1));
        assert_eq!(run.seed(), 42);
    }

    #[test]
    fn test_config_bad_duration() {
        let cfg = config(RuntimeConfig {
            duration: Some("soon".to_string()),
            ..RuntimeConfig::default()
        });
        match cfg.run_config() {
            Err(ConfigError::InvalidDuration { field, value, .. }) => {
                assert_eq!(field, "duration");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_scenario_and_targets() {
        let cfg = config(RuntimeConfig::default());
        let scenario = cfg.scenario().unwrap();
        assert_eq!(scenario.name(), "test");
        assert!(matches!(scenario.mode(), ExecutionMode::Weighted(_)));

        let targets = cfg.targets().unwrap();
        assert_eq!(targets.names(), vec!["primary".to_string()]);
    }

    #[test]
    fn test_config_bulk_and_report() {
        let cfg: Config = ::toml::from_str(
            r#"
            [workload]
            bulk_batch_size = 5
            [[workload.operations]]
            kind = "put_all"
            [[workload.operations]]
            kind = "remove_for_key_and_value"
            [[targets]]
            name = "primary"
            [report]
            outcomes = ["PUT_ALL", "MISS"]
        "#,
        )
        .unwrap();
        assert_eq!(cfg.workload.bulk_batch_size, 5);
        assert_eq!(cfg.report.outcomes, Some(vec![Outcome::PutAll, Outcome::Miss]));
        assert!(matches!(cfg.scenario().unwrap().mode(), ExecutionMode::Sequential));
        assert!(cfg.workload.to_string().ends_with("bulk_batch_size=5"));
    }

    #[test]
    fn test_config_zero_batch_size() {
        let mut cfg = config(RuntimeConfig::default());
        cfg.workload.operations[0].kind = OperationKind::GetAll;
        cfg.workload.bulk_batch_size = 0;
        assert_eq!(cfg.scenario().unwrap_err(), ConfigError::ZeroBatchSize(OperationKind::GetAll));
        assert!(cfg.report.outcomes.is_none());
    }

    #[test]
    fn test_config_no_targets() {
        let mut cfg = config(RuntimeConfig::default());
        cfg.targets.clear();
        assert_eq!(cfg.targets().unwrap_err(), ConfigError::NoTargets);
    }
}
