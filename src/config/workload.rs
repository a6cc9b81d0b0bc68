//! Workload definition structures

use crate::operation::OperationKind;
use crate::util::time::format_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Key-space access pattern
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionType {
    /// Linear sweep, `seq mod (upper - lower) + lower`
    Sequential {
        #[serde(default)]
        lower_bound: u64,
        #[serde(default = "default_upper_bound")]
        upper_bound: u64,
    },
    /// Normal distribution centered on the middle of the range
    Gaussian {
        lower_bound: u64,
        upper_bound: u64,
        spread: f64,
    },
    /// Equal probability across the range
    Uniform { lower_bound: u64, upper_bound: u64 },
}

fn default_upper_bound() -> u64 {
    u64::MAX
}

impl DistributionType {
    /// Unbounded sequential sweep (index == sequence number)
    pub fn sequential() -> Self {
        Self::Sequential {
            lower_bound: 0,
            upper_bound: u64::MAX,
        }
    }

    pub fn gaussian(lower_bound: u64, upper_bound: u64, spread: f64) -> Self {
        Self::Gaussian {
            lower_bound,
            upper_bound,
            spread,
        }
    }
}

impl Default for DistributionType {
    fn default() -> Self {
        Self::sequential()
    }
}

/// One operation entry of a workload file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationConfig {
    pub kind: OperationKind,
    /// Probability weight; omit on every operation for a sequential scenario
    pub weight: Option<f64>,
    #[serde(default)]
    pub distribution: DistributionType,
}

/// When a run is complete
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Termination {
    /// Fixed number of cycles across all workers
    Iterations(u64),
    /// Wall-clock duration
    Duration(Duration),
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionType::Sequential {
                lower_bound,
                upper_bound,
            } => {
                if *lower_bound == 0 && *upper_bound == u64::MAX {
                    write!(f, "sequential")
                } else {
                    write!(f, "sequential[{}, {})", lower_bound, upper_bound)
                }
            }
            DistributionType::Gaussian {
                lower_bound,
                upper_bound,
                spread,
            } => write!(f, "gaussian[{}, {}) spread={}", lower_bound, upper_bound, spread),
            DistributionType::Uniform {
                lower_bound,
                upper_bound,
            } => write!(f, "uniform[{}, {})", lower_bound, upper_bound),
        }
    }
}

impl fmt::Display for OperationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) => write!(f, "{} {:.0}% {}", self.kind, weight * 100.0, self.distribution),
            None => write!(f, "{} {}", self.kind, self.distribution),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Iterations(n) => write!(f, "{} iterations", n),
            Termination::Duration(d) => write!(f, "duration({})", format_duration(*d)),
        }
    }
}
