//! Fixed-length string generation

use super::ObjectGenerator;

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Strings of a fixed length
///
/// The index is rendered in base 62 and left-padded with `'0'`. Distinct
/// indices below `62^length` produce distinct strings; beyond that only the
/// least significant digits are kept.
#[derive(Debug, Clone, Copy)]
pub struct StringGenerator {
    length: usize,
}

impl StringGenerator {
    pub fn fixed_length(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl ObjectGenerator<String> for StringGenerator {
    fn generate(&self, index: u64) -> String {
        let mut buf = vec![b'0'; self.length];
        let mut rest = index;
        for slot in buf.iter_mut().rev() {
            if rest == 0 {
                break;
            }
            *slot = ALPHABET[(rest % 62) as usize];
            rest /= 62;
        }
        // Only ASCII bytes from ALPHABET
        String::from_utf8(buf).unwrap_or_default()
    }
}
