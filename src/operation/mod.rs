//! Cache operations and their outcomes
//!
//! An [`Operation`] is a plain description: which [`OperationKind`] to run,
//! an optional probability weight, the key-space [`DistributionType`] and the
//! generators that turn a sampled index into a key and a value. Nothing is
//! validated here; [`Scenario::new`](crate::scenario::Scenario::new) binds and
//! checks a whole list at once.
//!
//! Once bound, an operation runs one cycle against every cache target:
//!
//! ```text
//! seq ──► Distribution::sample ──► index ──► keys.generate(index)
//!                                        └─► values.generate(index)   (value kinds)
//!
//! bulk kinds: keys and values for index, index + 1, .. index + batch_size - 1
//!
//! for each target:  measure( catch_unwind( dispatch(kind, cache, payload) ) )
//!                          └─► Outcome ──► StatisticsRegistry slot (target, kind, outcome)
//! ```
//!
//! # Example
//!
//! ```
//! use cachepulse::config::workload::DistributionType;
//! use cachepulse::generator::{bytes::ByteArrayGenerator, string::StringGenerator};
//! use cachepulse::operation::{Operation, OperationKind};
//!
//! let keys = StringGenerator::fixed_length(10);
//! let values = ByteArrayGenerator::fixed_length(128);
//!
//! let get = Operation::<String, Vec<u8>>::get(keys)
//!     .with_weight(0.8)
//!     .with_distribution(DistributionType::gaussian(0, 10_000, 1_000.0));
//! let put = Operation::put(keys, values).with_weight(0.2);
//!
//! assert_eq!(get.kind(), OperationKind::Get);
//! assert_eq!(put.weight(), Some(0.2));
//! ```

pub mod weight;

use crate::config::workload::DistributionType;
use crate::distribution::{self, randomizer::Randomizer, Distribution};
use crate::error::{CacheError, ConfigError};
use crate::generator::ObjectGenerator;
use crate::stats::histogram::WorkerLatencies;
use crate::stats::StatisticsRegistry;
use crate::target::{Cache, CacheTargets};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Logical cache operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Get,
    Put,
    Remove,
    PutIfAbsent,
    Replace,
    /// Remove only while `key` still maps to the expected value
    RemoveForKeyAndValue,
    /// Replace only while `key` still maps to the expected value
    ReplaceForKeyAndValue,
    PutAll,
    GetAll,
    RemoveAll,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Get,
        OperationKind::Put,
        OperationKind::Remove,
        OperationKind::PutIfAbsent,
        OperationKind::Replace,
        OperationKind::RemoveForKeyAndValue,
        OperationKind::ReplaceForKeyAndValue,
        OperationKind::PutAll,
        OperationKind::GetAll,
        OperationKind::RemoveAll,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Dense index used by the statistics arena
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            OperationKind::Get => 0,
            OperationKind::Put => 1,
            OperationKind::Remove => 2,
            OperationKind::PutIfAbsent => 3,
            OperationKind::Replace => 4,
            OperationKind::RemoveForKeyAndValue => 5,
            OperationKind::ReplaceForKeyAndValue => 6,
            OperationKind::PutAll => 7,
            OperationKind::GetAll => 8,
            OperationKind::RemoveAll => 9,
        }
    }

    /// Outcomes this kind can legally produce
    pub fn outcomes(self) -> &'static [Outcome] {
        match self {
            OperationKind::Get => &[Outcome::Get, Outcome::Miss, Outcome::Exception],
            OperationKind::Put => &[Outcome::Put, Outcome::Exception],
            OperationKind::Remove | OperationKind::RemoveForKeyAndValue => {
                &[Outcome::Remove, Outcome::Miss, Outcome::Exception]
            }
            OperationKind::PutIfAbsent => &[Outcome::PutIfAbsent, Outcome::Get, Outcome::Exception],
            OperationKind::Replace | OperationKind::ReplaceForKeyAndValue => {
                &[Outcome::Replace, Outcome::Miss, Outcome::Exception]
            }
            OperationKind::PutAll => &[Outcome::PutAll, Outcome::Exception],
            OperationKind::GetAll => &[Outcome::GetAll, Outcome::Miss, Outcome::Exception],
            OperationKind::RemoveAll => &[Outcome::RemoveAll, Outcome::Exception],
        }
    }

    /// Whether the operation needs a value generator
    ///
    /// True for writes and for the key-and-value conditional kinds, which
    /// compare against the generated value.
    pub fn needs_value(self) -> bool {
        matches!(
            self,
            OperationKind::Put
                | OperationKind::PutIfAbsent
                | OperationKind::Replace
                | OperationKind::RemoveForKeyAndValue
                | OperationKind::ReplaceForKeyAndValue
                | OperationKind::PutAll
        )
    }

    /// Whether one cycle touches a batch of consecutive keys
    pub fn is_bulk(self) -> bool {
        matches!(self, OperationKind::PutAll | OperationKind::GetAll | OperationKind::RemoveAll)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Put => "put",
            OperationKind::Remove => "remove",
            OperationKind::PutIfAbsent => "put_if_absent",
            OperationKind::Replace => "replace",
            OperationKind::RemoveForKeyAndValue => "remove_for_key_and_value",
            OperationKind::ReplaceForKeyAndValue => "replace_for_key_and_value",
            OperationKind::PutAll => "put_all",
            OperationKind::GetAll => "get_all",
            OperationKind::RemoveAll => "remove_all",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified result of one target call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Get,
    Miss,
    Put,
    Remove,
    PutIfAbsent,
    Replace,
    PutAll,
    GetAll,
    RemoveAll,
    Exception,
}

impl Outcome {
    pub const ALL: [Outcome; 10] = [
        Outcome::Get,
        Outcome::Miss,
        Outcome::Put,
        Outcome::Remove,
        Outcome::PutIfAbsent,
        Outcome::Replace,
        Outcome::PutAll,
        Outcome::GetAll,
        Outcome::RemoveAll,
        Outcome::Exception,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Outcome::Get => 0,
            Outcome::Miss => 1,
            Outcome::Put => 2,
            Outcome::Remove => 3,
            Outcome::PutIfAbsent => 4,
            Outcome::Replace => 5,
            Outcome::PutAll => 6,
            Outcome::GetAll => 7,
            Outcome::RemoveAll => 8,
            Outcome::Exception => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Get => "GET",
            Outcome::Miss => "MISS",
            Outcome::Put => "PUT",
            Outcome::Remove => "REMOVE",
            Outcome::PutIfAbsent => "PUT_IF_ABSENT",
            Outcome::Replace => "REPLACE",
            Outcome::PutAll => "PUT_ALL",
            Outcome::GetAll => "GET_ALL",
            Outcome::RemoveAll => "REMOVE_ALL",
            Outcome::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch size of a bulk operation unless overridden
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Unvalidated operation description
pub struct Operation<K, V> {
    kind: OperationKind,
    weight: Option<f64>,
    distribution: DistributionType,
    batch_size: usize,
    keys: Option<Arc<dyn ObjectGenerator<K>>>,
    values: Option<Arc<dyn ObjectGenerator<V>>>,
}

impl<K, V> Operation<K, V> {
    /// Operation with no generators attached
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            weight: None,
            distribution: DistributionType::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            keys: None,
            values: None,
        }
    }

    fn keyed(kind: OperationKind, keys: impl ObjectGenerator<K> + 'static) -> Self {
        Self::new(kind).with_keys(Arc::new(keys))
    }

    fn valued(
        kind: OperationKind,
        keys: impl ObjectGenerator<K> + 'static,
        values: impl ObjectGenerator<V> + 'static,
    ) -> Self {
        Self::keyed(kind, keys).with_values(Arc::new(values))
    }

    pub fn get(keys: impl ObjectGenerator<K> + 'static) -> Self {
        Self::keyed(OperationKind::Get, keys)
    }

    pub fn put(keys: impl ObjectGenerator<K> + 'static, values: impl ObjectGenerator<V> + 'static) -> Self {
        Self::valued(OperationKind::Put, keys, values)
    }

    pub fn remove(keys: impl ObjectGenerator<K> + 'static) -> Self {
        Self::keyed(OperationKind::Remove, keys)
    }

    pub fn put_if_absent(
        keys: impl ObjectGenerator<K> + 'static,
        values: impl ObjectGenerator<V> + 'static,
    ) -> Self {
        Self::valued(OperationKind::PutIfAbsent, keys, values)
    }

    pub fn replace(keys: impl ObjectGenerator<K> + 'static, values: impl ObjectGenerator<V> + 'static) -> Self {
        Self::valued(OperationKind::Replace, keys, values)
    }

    /// Remove only when the key still holds the value generated for it
    pub fn remove_for_key_and_value(
        keys: impl ObjectGenerator<K> + 'static,
        values: impl ObjectGenerator<V> + 'static,
    ) -> Self {
        Self::valued(OperationKind::RemoveForKeyAndValue, keys, values)
    }

    /// Rewrite the generated value only when the key still holds it
    pub fn replace_for_key_and_value(
        keys: impl ObjectGenerator<K> + 'static,
        values: impl ObjectGenerator<V> + 'static,
    ) -> Self {
        Self::valued(OperationKind::ReplaceForKeyAndValue, keys, values)
    }

    pub fn put_all(keys: impl ObjectGenerator<K> + 'static, values: impl ObjectGenerator<V> + 'static) -> Self {
        Self::valued(OperationKind::PutAll, keys, values)
    }

    pub fn get_all(keys: impl ObjectGenerator<K> + 'static) -> Self {
        Self::keyed(OperationKind::GetAll, keys)
    }

    pub fn remove_all(keys: impl ObjectGenerator<K> + 'static) -> Self {
        Self::keyed(OperationKind::RemoveAll, keys)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_distribution(mut self, distribution: DistributionType) -> Self {
        self.distribution = distribution;
        self
    }

    /// Keys touched per cycle by a bulk kind; ignored otherwise
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_keys(mut self, keys: Arc<dyn ObjectGenerator<K>>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn with_values(mut self, values: Arc<dyn ObjectGenerator<V>>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn distribution(&self) -> &DistributionType {
        &self.distribution
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<K, V> Clone for Operation<K, V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            weight: self.weight,
            distribution: self.distribution,
            batch_size: self.batch_size,
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Operation<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .field("distribution", &self.distribution)
            .field("batch_size", &self.batch_size)
            .field("keys", &self.keys.is_some())
            .field("values", &self.values.is_some())
            .finish()
    }
}

/// Arguments generated for one cycle, shared by every target
enum Payload<K, V> {
    Single { key: K, value: Option<V> },
    /// Consecutive indices starting at the sampled one
    Batch { keys: Vec<K>, values: Option<Vec<V>> },
}

/// Validated operation ready to run inside a worker
pub(crate) struct BoundOperation<K, V> {
    kind: OperationKind,
    sampler: Box<dyn Distribution>,
    batch_size: usize,
    keys: Arc<dyn ObjectGenerator<K>>,
    values: Option<Arc<dyn ObjectGenerator<V>>>,
}

impl<K, V> BoundOperation<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Check generators and build the sampler
    pub(crate) fn bind(operation: Operation<K, V>) -> Result<Self, ConfigError> {
        let kind = operation.kind;
        let keys = operation.keys.ok_or(ConfigError::MissingKeyGenerator(kind))?;
        let values = if kind.needs_value() {
            Some(operation.values.ok_or(ConfigError::MissingValueGenerator(kind))?)
        } else {
            None
        };
        if kind.is_bulk() && operation.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize(kind));
        }
        let sampler = distribution::build(&operation.distribution)?;

        Ok(Self {
            kind,
            sampler,
            batch_size: operation.batch_size,
            keys,
            values,
        })
    }

    pub(crate) fn kind(&self) -> OperationKind {
        self.kind
    }

    fn payload(&self, index: u64) -> Payload<K, V> {
        if !self.kind.is_bulk() {
            return Payload::Single {
                key: self.keys.generate(index),
                value: self.values.as_ref().map(|values| values.generate(index)),
            };
        }

        let indices = (0..self.batch_size as u64).map(|offset| index.wrapping_add(offset));
        Payload::Batch {
            keys: indices.clone().map(|i| self.keys.generate(i)).collect(),
            values: self
                .values
                .as_ref()
                .map(|values| indices.map(|i| values.generate(i)).collect()),
        }
    }

    /// Run one cycle against every target
    ///
    /// Failures and panics inside a target call are recorded as
    /// [`Outcome::Exception`] and never escape.
    pub(crate) fn execute(
        &self,
        seq: u64,
        randomizer: &Randomizer,
        targets: &CacheTargets<K, V>,
        stats: &StatisticsRegistry,
        shard: usize,
        latencies: &mut WorkerLatencies,
    ) {
        let index = self.sampler.sample(seq, randomizer);
        let payload = self.payload(index);

        for (target, cache) in targets.iter().enumerate() {
            let (_, elapsed) = stats.measure(shard, target, self.kind, || invoke(self.kind, cache, &payload));
            latencies.record(target, self.kind, elapsed);
        }
    }
}

impl<K, V> fmt::Debug for BoundOperation<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundOperation")
            .field("kind", &self.kind)
            .field("sampler", &self.sampler)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

/// Call the target, turning a panic into an exception outcome
fn invoke<K: Clone, V: Clone>(kind: OperationKind, cache: &dyn Cache<K, V>, payload: &Payload<K, V>) -> Outcome {
    let call = || match payload {
        Payload::Single { key, value } => dispatch(kind, cache, key, value.as_ref()),
        Payload::Batch { keys, values } => dispatch_bulk(kind, cache, keys, values.as_deref()),
    };
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(outcome)) => {
            debug_assert!(kind.outcomes().contains(&outcome));
            outcome
        }
        Ok(Err(_)) | Err(_) => Outcome::Exception,
    }
}

fn dispatch<K: Clone, V: Clone>(
    kind: OperationKind,
    cache: &dyn Cache<K, V>,
    key: &K,
    value: Option<&V>,
) -> Result<Outcome, CacheError> {
    let outcome = match kind {
        OperationKind::Get => match cache.get(key)? {
            Some(_) => Outcome::Get,
            None => Outcome::Miss,
        },
        OperationKind::Remove => match cache.remove(key)? {
            Some(_) => Outcome::Remove,
            None => Outcome::Miss,
        },
        OperationKind::Put => {
            cache.put(key.clone(), required(kind, value)?)?;
            Outcome::Put
        }
        OperationKind::PutIfAbsent => match cache.put_if_absent(key.clone(), required(kind, value)?)? {
            None => Outcome::PutIfAbsent,
            Some(_) => Outcome::Get,
        },
        OperationKind::Replace => match cache.replace(key, required(kind, value)?)? {
            Some(_) => Outcome::Replace,
            None => Outcome::Miss,
        },
        OperationKind::RemoveForKeyAndValue => {
            if cache.remove_entry(key, &required(kind, value)?)? {
                Outcome::Remove
            } else {
                Outcome::Miss
            }
        }
        OperationKind::ReplaceForKeyAndValue => {
            let value = required(kind, value)?;
            if cache.replace_entry(key, &value, value.clone())? {
                Outcome::Replace
            } else {
                Outcome::Miss
            }
        }
        OperationKind::PutAll | OperationKind::GetAll | OperationKind::RemoveAll => {
            return Err(CacheError::failed(format!("{} invoked with a single key", kind)));
        }
    };
    Ok(outcome)
}

fn dispatch_bulk<K: Clone, V: Clone>(
    kind: OperationKind,
    cache: &dyn Cache<K, V>,
    keys: &[K],
    values: Option<&[V]>,
) -> Result<Outcome, CacheError> {
    let outcome = match kind {
        OperationKind::PutAll => {
            let values =
                values.ok_or_else(|| CacheError::failed(format!("{} invoked without values", kind)))?;
            cache.put_all(keys.iter().cloned().zip(values.iter().cloned()).collect())?;
            Outcome::PutAll
        }
        OperationKind::GetAll => {
            if cache.get_all(keys)?.iter().any(Option::is_some) {
                Outcome::GetAll
            } else {
                Outcome::Miss
            }
        }
        OperationKind::RemoveAll => {
            cache.remove_all(keys)?;
            Outcome::RemoveAll
        }
        _ => return Err(CacheError::failed(format!("{} invoked with a batch", kind))),
    };
    Ok(outcome)
}

fn required<V: Clone>(kind: OperationKind, value: Option<&V>) -> Result<V, CacheError> {
    value
        .cloned()
        .ok_or_else(|| CacheError::failed(format!("{} invoked without a value", kind)))
}
