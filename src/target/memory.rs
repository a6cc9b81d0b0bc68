//! In-process map cache

use super::Cache;
use crate::error::CacheError;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

/// Unbounded `HashMap` behind a `RwLock`
///
/// No eviction and no expiry. Good enough as a baseline target and for
/// exercising the harness itself.
#[derive(Debug, Default)]
pub struct InMemoryCache<K, V> {
    map: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> CacheError {
    CacheError::failed("cache lock poisoned")
}

impl<K, V> Cache<K, V> for InMemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + PartialEq + Send + Sync,
{
    fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        Ok(self.map.read().map_err(poisoned)?.get(key).cloned())
    }

    fn put(&self, key: K, value: V) -> Result<(), CacheError> {
        self.map.write().map_err(poisoned)?.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<Option<V>, CacheError> {
        Ok(self.map.write().map_err(poisoned)?.remove(key))
    }

    fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>, CacheError> {
        let mut map = self.map.write().map_err(poisoned)?;
        match map.get(&key) {
            Some(existing) => Ok(Some(existing.clone())),
            None => {
                map.insert(key, value);
                Ok(None)
            }
        }
    }

    fn replace(&self, key: &K, value: V) -> Result<Option<V>, CacheError> {
        let mut map = self.map.write().map_err(poisoned)?;
        Ok(map.get_mut(key).map(|slot| std::mem::replace(slot, value)))
    }

    fn remove_entry(&self, key: &K, expected: &V) -> Result<bool, CacheError> {
        let mut map = self.map.write().map_err(poisoned)?;
        if map.get(key) == Some(expected) {
            map.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    fn replace_entry(&self, key: &K, expected: &V, value: V) -> Result<bool, CacheError> {
        let mut map = self.map.write().map_err(poisoned)?;
        match map.get_mut(key) {
            Some(slot) if slot == expected => {
                *slot = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn put_all(&self, entries: Vec<(K, V)>) -> Result<(), CacheError> {
        self.map.write().map_err(poisoned)?.extend(entries);
        Ok(())
    }

    fn get_all(&self, keys: &[K]) -> Result<Vec<Option<V>>, CacheError> {
        let map = self.map.read().map_err(poisoned)?;
        Ok(keys.iter().map(|key| map.get(key).cloned()).collect())
    }

    fn remove_all(&self, keys: &[K]) -> Result<(), CacheError> {
        let mut map = self.map.write().map_err(poisoned)?;
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }
}
