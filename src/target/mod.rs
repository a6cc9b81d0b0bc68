//! Cache targets
//!
//! This module defines the boundary between the harness and the system under
//! test. A target is anything implementing [`Cache`]; the harness never builds or
//! configures one itself, it only receives them ready to use.
//!
//! # Architecture
//!
//! Workers hold a shared [`CacheTargets`] and call every target once per cycle,
//! in declaration order. Target ids are the positions in that order and are also
//! the first dimension of the statistics arena.
//!
//! # Provided implementations
//!
//! - [`memory::InMemoryCache`]: `RwLock<HashMap>`, used by the CLI and tests
//! - [`mock::MockCache`]: test double that can fail, panic or stall on demand
//!
//! # Example
//!
//! ```
//! use cachepulse::target::{Cache, CacheTargets, memory::InMemoryCache};
//! use std::sync::Arc;
//!
//! let primary: Arc<dyn Cache<String, Vec<u8>>> = Arc::new(InMemoryCache::new());
//! let targets = CacheTargets::new(vec![("primary".to_string(), primary)])?;
//!
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets.names(), vec!["primary".to_string()]);
//! # Ok::<(), cachepulse::error::ConfigError>(())
//! ```

pub mod memory;
pub mod mock;

use crate::error::{CacheError, ConfigError};
use std::fmt;
use std::sync::Arc;

/// Cache under test
///
/// Implementations must be safe to call concurrently from every worker thread.
/// A returned `Err` (or a panic) is recorded as an exception for that cycle and
/// the run continues.
pub trait Cache<K, V>: Send + Sync {
    /// Current mapping for `key`
    fn get(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Store `value` under `key`, overwriting any existing mapping
    fn put(&self, key: K, value: V) -> Result<(), CacheError>;

    /// Remove the mapping for `key`, returning it if one existed
    fn remove(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Store only if `key` is unmapped
    ///
    /// Returns `None` when the value was stored, or the existing value.
    fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>, CacheError>;

    /// Overwrite only if `key` is mapped
    ///
    /// Returns the previous value when replaced, `None` if `key` was unmapped.
    fn replace(&self, key: &K, value: V) -> Result<Option<V>, CacheError>;

    /// Remove `key` only while it maps to `expected`
    ///
    /// Returns whether the mapping was removed.
    fn remove_entry(&self, key: &K, expected: &V) -> Result<bool, CacheError>;

    /// Overwrite `key` with `value` only while it maps to `expected`
    ///
    /// Returns whether the mapping was replaced.
    fn replace_entry(&self, key: &K, expected: &V, value: V) -> Result<bool, CacheError>;

    /// Store every entry of `entries`
    ///
    /// The default stores them one `put` at a time; implementations with a
    /// native batch write should override it.
    fn put_all(&self, entries: Vec<(K, V)>) -> Result<(), CacheError> {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }

    /// Current mapping for each of `keys`, in order
    fn get_all(&self, keys: &[K]) -> Result<Vec<Option<V>>, CacheError> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Remove the mapping for each of `keys`
    fn remove_all(&self, keys: &[K]) -> Result<(), CacheError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Named, ordered, non-empty set of cache targets
pub struct CacheTargets<K, V> {
    names: Vec<String>,
    caches: Vec<Arc<dyn Cache<K, V>>>,
}

impl<K, V> CacheTargets<K, V> {
    /// # Errors
    ///
    /// [`ConfigError::NoTargets`] for an empty list and
    /// [`ConfigError::DuplicateTarget`] when a name repeats.
    pub fn new(targets: Vec<(String, Arc<dyn Cache<K, V>>)>) -> Result<Self, ConfigError> {
        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let mut names: Vec<String> = Vec::with_capacity(targets.len());
        let mut caches = Vec::with_capacity(targets.len());
        for (name, cache) in targets {
            if names.contains(&name) {
                return Err(ConfigError::DuplicateTarget(name));
            }
            names.push(name);
            caches.push(cache);
        }

        Ok(Self { names, caches })
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Targets in declaration order; the position is the target id
    pub fn iter(&self) -> impl Iterator<Item = &dyn Cache<K, V>> {
        self.caches.iter().map(|cache| cache.as_ref())
    }
}

impl<K, V> fmt::Debug for CacheTargets<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTargets").field("names", &self.names).finish()
    }
}
