//! cachepulse - load generation harness for caches
//!
//! cachepulse drives one or more cache implementations with a weighted mix of
//! operations, at a chosen key access distribution, for a bounded iteration
//! count or duration, and reports per (target, operation, outcome) statistics
//! gathered across concurrent worker threads.
//!
//! # Architecture
//!
//! - **Sequence-driven**: every cycle draws one number from a shared counter;
//!   keys, values and the operation choice are pure functions of it and the seed
//! - **Distributions**: sequential, Gaussian and uniform key access
//! - **Operations**: get, put, remove, put-if-absent, replace, their
//!   key-and-value conditional forms, and bulk put/get/remove over batches of
//!   consecutive keys, dispatched over a closed enum and classified into outcomes
//! - **Statistics**: lock-free per-worker counter shards plus per-worker
//!   latency histograms merged at the end of a run
//! - **Targets**: anything implementing [`Cache`]
//!
//! # Example
//!
//! ```
//! use cachepulse::{Cache, CacheTargets, Operation, RunConfig, Runner, Scenario};
//! use cachepulse::generator::LongGenerator;
//! use cachepulse::operation::{OperationKind, Outcome};
//! use cachepulse::target::memory::InMemoryCache;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scenario = Scenario::new(
//!     "read-mostly",
//!     vec![
//!         Operation::<u64, u64>::get(LongGenerator).with_weight(0.9),
//!         Operation::put(LongGenerator, LongGenerator).with_weight(0.1),
//!     ],
//! )?;
//! let cache: Arc<dyn Cache<u64, u64>> = Arc::new(InMemoryCache::new());
//! let targets = CacheTargets::new(vec![("memory".to_string(), cache)])?;
//! let config = RunConfig::new(4, Some(10_000), None, None, Duration::from_secs(60), 42)?;
//!
//! let summary = Runner::new(scenario, targets, config).start()?;
//! let snapshot = &summary.snapshot;
//! assert_eq!(snapshot.total_ops() + snapshot.idle_cycles, 10_000);
//! assert!(snapshot.kind_total(OperationKind::Get) > snapshot.kind_total(OperationKind::Put));
//! assert_eq!(snapshot.outcome_total(Outcome::Exception), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod observability;
pub mod operation;
pub mod output;
pub mod scenario;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::{Config, RunConfig};
pub use coordinator::{RunState, RunSummary, Runner};
pub use error::{CacheError, ConfigError, Error};
pub use operation::{Operation, OperationKind, Outcome};
pub use scenario::Scenario;
pub use stats::snapshot::StatsSnapshot;
pub use target::{Cache, CacheTargets};
