//! Fixed-length byte array generation

use super::ObjectGenerator;
use rand::RngCore;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Byte arrays of a fixed length
///
/// Contents are pseudo-random but fully determined by the index, so a value
/// read back can be compared with the one that was written.
#[derive(Debug, Clone, Copy)]
pub struct ByteArrayGenerator {
    length: usize,
}

impl ByteArrayGenerator {
    pub fn fixed_length(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl ObjectGenerator<Vec<u8>> for ByteArrayGenerator {
    fn generate(&self, index: u64) -> Vec<u8> {
        let mut buf = vec![0u8; self.length];
        Xoshiro256PlusPlus::seed_from_u64(index).fill_bytes(&mut buf);
        buf
    }
}
