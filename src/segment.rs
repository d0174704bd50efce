//! Segment of the value domain and its enumeration bounds.
//!
//! - Segments are half-open: `(from, to]`
//! - `i_max = floor(cbrt(to - 1))`: the smallest partner cube is 1
//! - `i_min = ceil(cbrt((from + 1) / 2))`: `2 * i^3` must still reach
//!   past `from`

use crate::cube::{ceil_cbrt, floor_cbrt};

/// Half-open slice `(from, to]` of the value domain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    from: u64,
    to: u64,
}

impl Segment {
    /// Create new segment `(from, to]`
    #[inline]
    pub fn new(from: u64, to: u64) -> Self {
        debug_assert!(from <= to, "segment ({}, {}] is reversed", from, to);
        Self { from, to }
    }

    /// Get exclusive lower end
    #[inline]
    pub fn from(&self) -> u64 {
        self.from
    }

    /// Get inclusive upper end
    #[inline]
    pub fn to(&self) -> u64 {
        self.to
    }

    /// Number of values covered
    #[inline]
    pub fn width(&self) -> u64 {
        self.to - self.from
    }

    /// Check if segment covers no value
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Check if `value` lies in `(from, to]`
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        self.from < value && value <= self.to
    }

    /// Range of `i` to enumerate, `None` if no pair can land in the segment
    #[inline]
    pub fn bounds(&self) -> Option<SegmentBounds> {
        SegmentBounds::of(self)
    }
}

/// Bracket of the larger cube root `i` for pairs `j <= i` summing into a
/// segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentBounds {
    i_min: u64,
    i_max: u64,
}

impl SegmentBounds {
    /// Compute the bracket for `segment`
    pub fn of(segment: &Segment) -> Option<Self> {
        if segment.is_empty() {
            return None;
        }

        let i_max = floor_cbrt(segment.to() - 1);
        let i_min = ceil_cbrt((segment.from() + 1).div_ceil(2)).max(1);

        (i_min <= i_max).then_some(Self { i_min, i_max })
    }

    /// Get smallest `i` worth visiting
    #[inline]
    pub fn i_min(&self) -> u64 {
        self.i_min
    }

    /// Get largest `i` worth visiting
    #[inline]
    pub fn i_max(&self) -> u64 {
        self.i_max
    }

    /// Iterate `i` from `i_max` down to `i_min`
    #[inline]
    pub fn descending(&self) -> impl Iterator<Item = u64> {
        (self.i_min..=self.i_max).rev()
    }
}
