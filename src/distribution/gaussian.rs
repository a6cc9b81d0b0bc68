//! Gaussian (normal) distribution implementation
//!
//! Simulates locality of reference: accesses cluster around the middle of the
//! key range and thin out towards the edges.
//!
//! # Parameters
//!
//! - **lower_bound / upper_bound**: key range, the mean sits at its midpoint
//! - **spread**: standard deviation, in index units
//!
//! # Clamping
//!
//! Draws falling outside `[lower_bound, upper_bound)` are clamped to the nearest
//! bound rather than resampled, so every call is O(1).
//!
//! # Example
//!
//! ```
//! use cachepulse::distribution::{Distribution, gaussian::GaussianDistribution};
//! use cachepulse::distribution::randomizer::Randomizer;
//!
//! let dist = GaussianDistribution::new(0, 10_000, 1_000.0)?;
//! let index = dist.sample(42, &Randomizer::new(7));
//! assert!(index < 10_000);
//! # Ok::<(), cachepulse::error::ConfigError>(())
//! ```

use super::{check_bounds, Distribution, SAMPLING_STREAM};
use crate::distribution::randomizer::Randomizer;
use crate::error::ConfigError;
use rand_distr::{Distribution as _, Normal};

/// Gaussian distribution for locality of reference
#[derive(Debug, Clone, Copy)]
pub struct GaussianDistribution {
    lower_bound: u64,
    upper_bound: u64,

    /// Normal(mean = midpoint, stddev = spread)
    normal: Normal<f64>,
}

impl GaussianDistribution {
    /// Create a Gaussian distribution over `[lower_bound, upper_bound)`
    ///
    /// # Errors
    ///
    /// Fails if the range is empty or `spread` is not positive and finite.
    pub fn new(lower_bound: u64, upper_bound: u64, spread: f64) -> Result<Self, ConfigError> {
        check_bounds(lower_bound, upper_bound)?;
        if !spread.is_finite() || spread <= 0.0 {
            return Err(ConfigError::InvalidDistribution(format!(
                "gaussian spread must be positive, got {}",
                spread
            )));
        }

        let mean = lower_bound as f64 + (upper_bound - lower_bound) as f64 / 2.0;
        let normal = Normal::new(mean, spread)
            .map_err(|e| ConfigError::InvalidDistribution(e.to_string()))?;

        Ok(Self {
            lower_bound,
            upper_bound,
            normal,
        })
    }

    /// Center of the distribution
    pub fn mean(&self) -> f64 {
        self.normal.mean()
    }

    /// Standard deviation
    pub fn spread(&self) -> f64 {
        self.normal.std_dev()
    }

    #[inline]
    fn clamp(&self, value: f64) -> u64 {
        if !(value >= self.lower_bound as f64) {
            // Also catches NaN
            return self.lower_bound;
        }
        let index = value as u64;
        index.min(self.upper_bound - 1)
    }
}

impl Distribution for GaussianDistribution {
    #[inline]
    fn sample(&self, seq: u64, randomizer: &Randomizer) -> u64 {
        let mut rng = randomizer.rng(seq, SAMPLING_STREAM);
        self.clamp(self.normal.sample(&mut rng))
    }

    fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    fn upper_bound(&self) -> u64 {
        self.upper_bound
    }
}
