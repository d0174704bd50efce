//! Iterator splitting `(0, bound]` into segments

use std::iter::FusedIterator;

use crate::segment::Segment;

/// Contiguous segments `(0, S], (S, 2S], ...`, the last one clipped to the
/// bound
#[derive(Clone, Debug)]
pub struct Segments {
    next_from: u64,
    bound: u64,
    stride: u64,
}

impl Segments {
    /// Create an iterator over `(0, bound]` in steps of `stride`
    ///
    /// # Panics
    /// Panics if `stride` is zero
    pub fn new(bound: u64, stride: u64) -> Self {
        assert!(stride > 0, "stride must be positive");
        Self {
            next_from: 0,
            bound,
            stride,
        }
    }

    /// Get the bound
    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Get the stride
    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_from >= self.bound {
            return None;
        }

        let from = self.next_from;
        let to = from.saturating_add(self.stride).min(self.bound);
        self.next_from = to;

        Some(Segment::new(from, to))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bound - self.next_from.min(self.bound)).div_ceil(self.stride);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments {}

impl FusedIterator for Segments {}
