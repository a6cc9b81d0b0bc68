//! Scenarios: the operation mix of one logical test
//!
//! A scenario is built once from a list of [`Operation`]s and shared read-only
//! by every worker. Its execution mode follows from the weights:
//!
//! - no operation has a weight: **sequential**, each worker cycles through the
//!   operations in declared order, one per cycle
//! - every operation has a weight: **weighted**, each cycle draws
//!   `Randomizer::next_double(seq)` and resolves it against an
//!   [`OperationWeightTable`]; draws past the last weight are idle cycles
//!
//! Any other combination is rejected up front.

use crate::distribution::randomizer::Randomizer;
use crate::error::ConfigError;
use crate::operation::weight::OperationWeightTable;
use crate::operation::{BoundOperation, Operation, OperationKind};
use serde::Serialize;
use std::fmt;

/// How a scenario picks the operation for a cycle
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionMode {
    /// Declared order, one operation per cycle
    Sequential,
    /// Weighted random pick each cycle
    Weighted(OperationWeightTable),
}

/// Immutable, validated set of operations
pub struct Scenario<K, V> {
    name: String,
    mode: ExecutionMode,
    operations: Vec<BoundOperation<K, V>>,
    describe: Vec<OperationSummary>,
}

/// Serializable description of one scenario entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OperationSummary {
    pub kind: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub distribution: String,
}

impl<K, V> Scenario<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Validate and bind `operations`
    ///
    /// # Errors
    ///
    /// - an empty operation list
    /// - weighted and unweighted operations mixed together
    /// - any weight table error (range, sum above 1.0, duplicate kind)
    /// - an operation missing a generator, or with invalid distribution bounds
    pub fn new(name: impl Into<String>, operations: Vec<Operation<K, V>>) -> Result<Self, ConfigError> {
        let name = name.into();
        if operations.is_empty() {
            return Err(ConfigError::EmptyScenario(name));
        }

        let weighted = operations.iter().filter(|op| op.weight().is_some()).count();
        let mode = if weighted == 0 {
            ExecutionMode::Sequential
        } else if weighted == operations.len() {
            let weights: Vec<(OperationKind, f64)> = operations
                .iter()
                .map(|op| (op.kind(), op.weight().unwrap_or_default()))
                .collect();
            ExecutionMode::Weighted(OperationWeightTable::new(&weights)?)
        } else {
            return Err(ConfigError::MixedWeighting);
        };

        let describe = operations
            .iter()
            .map(|op| OperationSummary {
                kind: op.kind(),
                weight: op.weight(),
                distribution: op.distribution().to_string(),
            })
            .collect();

        let operations = operations
            .into_iter()
            .map(BoundOperation::bind)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            mode,
            operations,
            describe,
        })
    }
}

impl<K, V> Scenario<K, V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Declared operations, in order
    pub fn operations(&self) -> &[OperationSummary] {
        &self.describe
    }

    /// Operation to run for this cycle, `None` for an idle cycle
    ///
    /// `cursor` is the worker's own position in a sequential scenario and is
    /// left untouched in weighted mode.
    #[inline]
    pub(crate) fn pick(&self, seq: u64, randomizer: &Randomizer, cursor: &mut usize) -> Option<&BoundOperation<K, V>> {
        match &self.mode {
            ExecutionMode::Sequential => {
                let op = &self.operations[*cursor % self.operations.len()];
                *cursor = (*cursor + 1) % self.operations.len();
                Some(op)
            }
            ExecutionMode::Weighted(table) => table
                .resolve_index(randomizer.next_double(seq))
                .map(|i| &self.operations[i]),
        }
    }
}

impl<K, V> fmt::Debug for Scenario<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("operations", &self.operations)
            .finish()
    }
}

impl fmt::Display for OperationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) => write!(f, "{} {:.1}% {}", self.kind, weight * 100.0, self.distribution),
            None => write!(f, "{} {}", self.kind, self.distribution),
        }
    }
}
