//! Uniform random distribution
//!
//! Every index in the range has the same probability. Useful as a baseline
//! against the Gaussian hot-spot pattern.

use super::{check_bounds, Distribution, SAMPLING_STREAM};
use crate::distribution::randomizer::Randomizer;
use crate::error::ConfigError;
use rand::Rng;

/// Uniform random distribution over `[lower_bound, upper_bound)`
#[derive(Debug, Clone, Copy)]
pub struct UniformDistribution {
    lower_bound: u64,
    upper_bound: u64,
}

impl UniformDistribution {
    pub fn new(lower_bound: u64, upper_bound: u64) -> Result<Self, ConfigError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }
}

impl Distribution for UniformDistribution {
    #[inline(always)]
    fn sample(&self, seq: u64, randomizer: &Randomizer) -> u64 {
        randomizer
            .rng(seq, SAMPLING_STREAM)
            .gen_range(self.lower_bound..self.upper_bound)
    }

    fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    fn upper_bound(&self) -> u64 {
        self.upper_bound
    }
}
