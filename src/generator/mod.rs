//! Key and value generators
//!
//! An [`ObjectGenerator`] turns an index (produced by a
//! [`Distribution`](crate::distribution::Distribution)) into a domain object. It
//! must be pure: the same index always yields an equal object, which is what
//! lets a later `get` find the entry an earlier `put` wrote.
//!
//! # Provided generators
//!
//! - [`LongGenerator`]: the index itself
//! - [`string::StringGenerator`]: fixed-length strings
//! - [`bytes::ByteArrayGenerator`]: fixed-length byte arrays
//! - any `Fn(u64) -> T + Send + Sync` closure
//!
//! # Example
//!
//! ```
//! use cachepulse::generator::{ObjectGenerator, string::StringGenerator};
//!
//! let keys = StringGenerator::fixed_length(10);
//! assert_eq!(keys.generate(61), "000000000Z");
//!
//! let doubled = |index: u64| index * 2;
//! assert_eq!(doubled.generate(21), 42);
//! ```

pub mod bytes;
pub mod sequence;
pub mod string;

/// Deterministic index → object mapping
pub trait ObjectGenerator<T>: Send + Sync {
    fn generate(&self, index: u64) -> T;
}

impl<T, F> ObjectGenerator<T> for F
where
    F: Fn(u64) -> T + Send + Sync,
{
    #[inline]
    fn generate(&self, index: u64) -> T {
        self(index)
    }
}

/// Numeric keys or values, equal to the index
#[derive(Debug, Clone, Copy, Default)]
pub struct LongGenerator;

impl ObjectGenerator<u64> for LongGenerator {
    #[inline]
    fn generate(&self, index: u64) -> u64 {
        index
    }
}
