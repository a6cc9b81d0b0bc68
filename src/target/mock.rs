//! Mock cache for testing
//!
//! A [`Cache`] implementation that stores nothing. Its behaviour can be switched
//! at any time from another thread, which makes it handy for exercising the
//! failure paths of the harness.
//!
//! # Features
//!
//! - Configurable success, failure or panic on every call
//! - Optional artificial latency
//! - Thread-safe call counting
//!
//! # Example
//!
//! ```
//! use cachepulse::target::{Cache, mock::MockCache};
//!
//! let cache = MockCache::new();
//! assert_eq!(Cache::<u64, u64>::get(&cache, &1).unwrap(), None);
//!
//! cache.set_should_fail(true);
//! assert!(Cache::<u64, u64>::put(&cache, 1, 1).is_err());
//! assert_eq!(cache.calls(), 2);
//! ```

use super::Cache;
use crate::error::CacheError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Cache stand-in with switchable behaviour
///
/// When succeeding, every lookup misses and every write is accepted.
#[derive(Debug, Default)]
pub struct MockCache {
    should_fail: AtomicBool,
    should_panic: AtomicBool,
    /// Added to every call, in microseconds
    delay_us: AtomicU64,
    calls: AtomicU64,
}

impl MockCache {
    /// Mock that succeeds every call
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that returns an error from every call
    pub fn failing() -> Self {
        let cache = Self::new();
        cache.set_should_fail(true);
        cache
    }

    /// Mock that panics inside every call
    pub fn panicking() -> Self {
        let cache = Self::new();
        cache.set_should_panic(true);
        cache
    }

    /// Mock that sleeps for `delay` inside every call
    pub fn with_delay(delay: Duration) -> Self {
        let cache = Self::new();
        cache.set_delay(delay);
        cache
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::Relaxed);
    }

    pub fn set_should_panic(&self, should_panic: bool) {
        self.should_panic.store(should_panic, Ordering::Relaxed);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_us.store(delay.as_micros() as u64, Ordering::Relaxed);
    }

    /// Number of calls received, across all methods
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn call(&self) -> Result<(), CacheError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let delay = self.delay_us.load(Ordering::Relaxed);
        if delay > 0 {
            std::thread::sleep(Duration::from_micros(delay));
        }
        if self.should_panic.load(Ordering::Relaxed) {
            panic!("mock cache panic");
        }
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(CacheError::failed("mock cache failure"));
        }
        Ok(())
    }
}

impl<K, V> Cache<K, V> for MockCache {
    fn get(&self, _key: &K) -> Result<Option<V>, CacheError> {
        self.call().map(|_| None)
    }

    fn put(&self, _key: K, _value: V) -> Result<(), CacheError> {
        self.call()
    }

    fn remove(&self, _key: &K) -> Result<Option<V>, CacheError> {
        self.call().map(|_| None)
    }

    fn put_if_absent(&self, _key: K, _value: V) -> Result<Option<V>, CacheError> {
        self.call().map(|_| None)
    }

    fn replace(&self, _key: &K, _value: V) -> Result<Option<V>, CacheError> {
        self.call().map(|_| None)
    }

    fn remove_entry(&self, _key: &K, _expected: &V) -> Result<bool, CacheError> {
        self.call().map(|_| false)
    }

    fn replace_entry(&self, _key: &K, _expected: &V, _value: V) -> Result<bool, CacheError> {
        self.call().map(|_| false)
    }

    fn put_all(&self, _entries: Vec<(K, V)>) -> Result<(), CacheError> {
        self.call()
    }

    fn get_all(&self, keys: &[K]) -> Result<Vec<Option<V>>, CacheError> {
        self.call().map(|_| keys.iter().map(|_| None).collect())
    }

    fn remove_all(&self, _keys: &[K]) -> Result<(), CacheError> {
        self.call()
    }
}
