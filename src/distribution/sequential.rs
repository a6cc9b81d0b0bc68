//! Sequential index generation
//!
//! Walks the key space linearly: sequence number `n` maps to
//! `n mod (upper - lower) + lower`, wrapping back to the lower bound once the
//! range is exhausted.

use super::{check_bounds, Distribution};
use crate::distribution::randomizer::Randomizer;
use crate::error::ConfigError;

/// Sequential index generator
///
/// With the default bounds (`0..u64::MAX`) the index is the sequence number
/// itself.
#[derive(Debug, Clone, Copy)]
pub struct SequentialDistribution {
    lower_bound: u64,
    upper_bound: u64,
    span: u64,
}

impl SequentialDistribution {
    /// Create a sequential distribution over `[lower_bound, upper_bound)`
    pub fn new(lower_bound: u64, upper_bound: u64) -> Result<Self, ConfigError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            lower_bound,
            upper_bound,
            span: upper_bound - lower_bound,
        })
    }

    /// Unbounded sweep, index equals the sequence number
    pub fn unbounded() -> Self {
        Self {
            lower_bound: 0,
            upper_bound: u64::MAX,
            span: u64::MAX,
        }
    }
}

impl Default for SequentialDistribution {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Distribution for SequentialDistribution {
    #[inline]
    fn sample(&self, seq: u64, _randomizer: &Randomizer) -> u64 {
        seq % self.span + self.lower_bound
    }

    fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    fn upper_bound(&self) -> u64 {
        self.upper_bound
    }
}
