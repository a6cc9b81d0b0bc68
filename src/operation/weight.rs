//! Weighted operation selection
//!
//! The weight table partitions the unit interval into half-open slices, one per
//! operation, in declaration order:
//!
//! ```text
//! get 0.8, put 0.1, remove 0.05
//!
//! 0.0            0.8      0.9   0.95    1.0
//! [---- get ----)[- put -)[rem)[ idle  )
//! ```
//!
//! A uniform draw in `[0, 1)` is looked up against the partition. Draws past the
//! last boundary resolve to no operation, so a table summing to less than one
//! leaves that fraction of cycles idle.

use super::OperationKind;
use crate::error::ConfigError;

/// Slack allowed when checking the sum of weights against 1.0
const WEIGHT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Partition {
    kind: OperationKind,
    /// Exclusive upper bound of this slice
    upper: f64,
}

/// Cumulative probability partition over operation kinds
#[derive(Debug, Clone, PartialEq)]
pub struct OperationWeightTable {
    partitions: Vec<Partition>,
    total: f64,
}

impl OperationWeightTable {
    /// Build the partition
    ///
    /// # Errors
    ///
    /// - a weight outside `[0, 1]` (or NaN)
    /// - weights summing to more than 1.0
    /// - the same kind listed twice
    /// - an empty list
    pub fn new(weights: &[(OperationKind, f64)]) -> Result<Self, ConfigError> {
        if weights.is_empty() {
            return Err(ConfigError::EmptyWeightTable);
        }

        let mut partitions = Vec::with_capacity(weights.len());
        let mut cumulative = 0.0;

        for (i, &(kind, weight)) in weights.iter().enumerate() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::WeightOutOfRange { kind, weight });
            }
            if weights[..i].iter().any(|(k, _)| *k == kind) {
                return Err(ConfigError::DuplicateWeightedOperation(kind));
            }

            cumulative += weight;
            partitions.push(Partition {
                kind,
                upper: cumulative,
            });
        }

        if cumulative > 1.0 + WEIGHT_EPSILON {
            return Err(ConfigError::WeightsExceedOne { total: cumulative });
        }

        Ok(Self {
            partitions,
            total: cumulative.min(1.0),
        })
    }

    /// Operation whose slice contains `draw`, or `None` for an idle cycle
    ///
    /// A draw equal to a boundary belongs to the slice starting there.
    #[inline]
    pub fn resolve(&self, draw: f64) -> Option<OperationKind> {
        self.resolve_index(draw).map(|i| self.partitions[i].kind)
    }

    /// Position (in declaration order) of the resolved operation
    #[inline]
    pub fn resolve_index(&self, draw: f64) -> Option<usize> {
        let index = self.partitions.partition_point(|p| p.upper <= draw);
        if index < self.partitions.len() {
            Some(index)
        } else {
            None
        }
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Fraction of cycles expected to be idle
    pub fn idle_fraction(&self) -> f64 {
        1.0 - self.total
    }

    /// Configured weight of `kind`, if present
    pub fn weight_of(&self, kind: OperationKind) -> Option<f64> {
        let mut lower = 0.0;
        for p in &self.partitions {
            if p.kind == kind {
                return Some(p.upper - lower);
            }
            lower = p.upper;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}
