//! Error types
//!
//! Three tiers of failure exist in a run:
//!
//! - [`ConfigError`]: detected before any worker starts; always fatal.
//! - [`CacheError`]: raised by a target call during a cycle; recorded as
//!   [`Outcome::Exception`](crate::operation::Outcome::Exception) and never
//!   propagated.
//! - [`Error`]: what `Runner::start` can return to its caller.
//!
//! Timeouts are not errors. A run that exceeds its timeout returns a
//! `RunSummary` with `timed_out` set.

use crate::coordinator::RunState;
use crate::operation::OperationKind;
use thiserror::Error;

/// Invalid configuration, detected before the run starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight for {kind} must be within [0.0, 1.0], got {weight}")]
    WeightOutOfRange { kind: OperationKind, weight: f64 },

    #[error("operation weights must sum to at most 1.0, got {total}")]
    WeightsExceedOne { total: f64 },

    #[error("operation {0} appears more than once in a weighted scenario")]
    DuplicateWeightedOperation(OperationKind),

    #[error("weight table is empty")]
    EmptyWeightTable,

    #[error("scenario mixes weighted and unweighted operations")]
    MixedWeighting,

    #[error("scenario '{0}' has no operations")]
    EmptyScenario(String),

    #[error("operation {0} has no key generator")]
    MissingKeyGenerator(OperationKind),

    #[error("operation {0} has no value generator")]
    MissingValueGenerator(OperationKind),

    #[error("bulk operation {0} needs a batch size of at least 1")]
    ZeroBatchSize(OperationKind),

    #[error("at least one cache target must be specified")]
    NoTargets,

    #[error("cache target '{0}' is specified more than once")]
    DuplicateTarget(String),

    #[error("both an iteration count and a duration were specified")]
    AmbiguousTermination,

    #[error("either an iteration count or a duration must be specified")]
    MissingTermination,

    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("invalid {field} '{value}': {reason}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure reported by a cache target call
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache operation failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CacheError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors surfaced to the caller of the runner
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn worker thread {id}")]
    WorkerSpawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("runner cannot start from state {0}")]
    InvalidState(RunState),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::WeightsExceedOne { total: 1.2 };
        assert_eq!(err.to_string(), "operation weights must sum to at most 1.0, got 1.2");

        let err = ConfigError::MissingKeyGenerator(OperationKind::Get);
        assert_eq!(err.to_string(), "operation get has no key generator");
    }

    #[test]
    fn test_config_error_converts_into_error() {
        let err: Error = ConfigError::NoTargets.into();
        assert!(matches!(err, Error::Config(ConfigError::NoTargets)));
        assert_eq!(err.to_string(), "at least one cache target must be specified");
    }

    #[test]
    fn test_cache_error_from_boxed() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: CacheError = CacheError::from(Box::new(io) as Box<dyn std::error::Error + Send + Sync>);
        assert_eq!(err.to_string(), "disk gone");
        assert_eq!(CacheError::failed("boom").to_string(), "cache operation failed: boom");
    }
}
