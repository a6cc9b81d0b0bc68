//! Access distributions
//!
//! A distribution maps a sequence number onto an index in a bounded key space.
//! The index is then handed to an [`ObjectGenerator`](crate::generator::ObjectGenerator)
//! to produce the actual key or value.
//!
//! # Distributions
//!
//! - **Sequential**: linear sweep, `seq mod (upper - lower) + lower`
//! - **Gaussian**: normal distribution centered on the middle of the range
//! - **Uniform**: equal probability for every index in the range
//!
//! # Determinism
//!
//! Sampling is a pure function of the sequence number, the distribution's fixed
//! parameters and the run's [`Randomizer`]. The same sequence number always
//! lands on the same index, so a run can be replayed exactly.
//!
//! # Example
//!
//! ```
//! use cachepulse::config::workload::DistributionType;
//! use cachepulse::distribution::{self, randomizer::Randomizer};
//!
//! let dist = distribution::build(&DistributionType::Gaussian {
//!     lower_bound: 0,
//!     upper_bound: 10_000,
//!     spread: 1_000.0,
//! })?;
//!
//! let randomizer = Randomizer::new(42);
//! let index = dist.sample(17, &randomizer);
//! assert!(index < 10_000);
//! assert_eq!(index, dist.sample(17, &randomizer));
//! # Ok::<(), cachepulse::error::ConfigError>(())
//! ```

pub mod gaussian;
pub mod randomizer;
pub mod sequential;
pub mod uniform;

use crate::config::workload::DistributionType;
use crate::error::ConfigError;
use randomizer::Randomizer;

/// Stream reserved for key-space sampling, distinct from operation selection
pub(crate) const SAMPLING_STREAM: u64 = 1;

/// Maps a sequence number to an index in `[lower_bound, upper_bound)`
///
/// # Thread Safety
///
/// Distributions hold only immutable parameters and are shared by all workers
/// through `&self`; there is no per-thread state to keep in sync.
pub trait Distribution: Send + Sync + std::fmt::Debug {
    /// Index for `seq`
    ///
    /// Must be deterministic for a fixed `seq`, fixed parameters and a fixed
    /// randomizer seed.
    fn sample(&self, seq: u64, randomizer: &Randomizer) -> u64;

    /// Inclusive lower bound of produced indices
    fn lower_bound(&self) -> u64;

    /// Exclusive upper bound of produced indices
    fn upper_bound(&self) -> u64;
}

/// Build a sampler for a configured distribution
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDistribution`] if the bounds are empty or the
/// spread is not a positive, finite number.
pub fn build(dist: &DistributionType) -> Result<Box<dyn Distribution>, ConfigError> {
    let sampler: Box<dyn Distribution> = match *dist {
        DistributionType::Sequential {
            lower_bound,
            upper_bound,
        } => Box::new(sequential::SequentialDistribution::new(lower_bound, upper_bound)?),
        DistributionType::Gaussian {
            lower_bound,
            upper_bound,
            spread,
        } => Box::new(gaussian::GaussianDistribution::new(lower_bound, upper_bound, spread)?),
        DistributionType::Uniform {
            lower_bound,
            upper_bound,
        } => Box::new(uniform::UniformDistribution::new(lower_bound, upper_bound)?),
    };

    Ok(sampler)
}

/// Shared bounds check for all distributions
pub(crate) fn check_bounds(lower_bound: u64, upper_bound: u64) -> Result<(), ConfigError> {
    if lower_bound >= upper_bound {
        return Err(ConfigError::InvalidDistribution(format!(
            "lower bound {} must be below upper bound {}",
            lower_bound, upper_bound
        )));
    }
    Ok(())
}
