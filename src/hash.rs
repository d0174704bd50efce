//! Multiplicative hashing for integer keys.

use std::hash::{BuildHasher, Hasher};

/// 2^64 / golden ratio, odd
const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;

/// `BuildHasher` producing [`MulHasher`]s
///
/// Stateless and deterministic, so tables built with it hash identically
/// across runs and threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct MulHashState;

impl BuildHasher for MulHashState {
    type Hasher = MulHasher;

    #[inline]
    fn build_hasher(&self) -> MulHasher {
        MulHasher::default()
    }
}

/// Fibonacci hasher tuned for `u64` keys
///
/// The product keeps its entropy in the high bits; `finish` folds them onto
/// the low bits so that masking with a power-of-two table size stays well
/// spread even for structured keys such as cube sums.
#[derive(Clone, Copy, Debug, Default)]
pub struct MulHasher {
    state: u64,
}

impl Hasher for MulHasher {
    #[inline]
    fn write_u64(&mut self, n: u64) {
        self.state = (self.state ^ n).wrapping_mul(GOLDEN);
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.write_u64(u64::from_le_bytes(word));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state ^ (self.state >> 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = MulHashState.hash_one(1729u64);
        let b = MulHashState.hash_one(1729u64);
        assert_eq!(a, b);
        assert_ne!(a, MulHashState.hash_one(4104u64));
    }

    #[test]
    fn test_low_bits_spread() {
        // multiples of 1024 share their low ten bits; the hash must not
        let mask = 0xFF;
        let mut seen = std::collections::HashSet::new();
        for k in 0..256u64 {
            seen.insert(MulHashState.hash_one(k * 1024) & mask);
        }
        assert!(seen.len() > 128, "only {} distinct slots", seen.len());
    }

    #[test]
    fn test_write_bytes_matches_words() {
        let mut bytes = MulHasher::default();
        bytes.write(&42u64.to_le_bytes());

        let mut word = MulHasher::default();
        word.write_u64(42);

        assert_eq!(bytes.finish(), word.finish());
    }
}
