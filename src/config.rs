//! Run configuration and table sizing.

use std::fmt;

use crate::error::{Error, Result};

/// Default segment width
pub const DEFAULT_STRIDE: u64 = 400_000_000;

/// Target average entries per bucket when deriving the bucket count
pub const TARGET_LOAD: f64 = 4.0;

/// Smallest derived bucket count
pub const MIN_BUCKETS: usize = 16;

/// Largest derived bucket count
pub const MAX_BUCKETS: usize = 1 << 24;

/// Pairs `1 <= j <= i` with `i^3 + j^3 <= x` number about
/// `CUBE_SUM_DENSITY * x^(2/3)`: half the area `Γ(4/3)^2 / Γ(5/3)` of
/// `{a, b >= 0 : a^3 + b^3 <= 1}`.
pub const CUBE_SUM_DENSITY: f64 = 0.4417;

/// How a segment's sums are aggregated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Incremental insert-and-count in a paged hash set
    #[default]
    Hash,
    /// Collect, sort and scan for runs
    Sort,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Hash => f.write_str("hash"),
            Strategy::Sort => f.write_str("sort"),
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Width of each segment; bounds peak memory per pass
    pub stride: u64,

    /// Hash-table bucket count, derived from the stride when `None`
    pub bucket_count: Option<usize>,

    /// Aggregation strategy
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            bucket_count: None,
            strategy: Strategy::default(),
        }
    }
}

impl Config {
    /// Set the segment width
    #[must_use]
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride;
        self
    }

    /// Pin the bucket count instead of deriving it
    #[must_use]
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = Some(bucket_count);
        self
    }

    /// Set the aggregation strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidConfig {
                reason: "stride must be positive",
            });
        }
        if let Some(count) = self.bucket_count {
            if !count.is_power_of_two() {
                return Err(Error::InvalidConfig {
                    reason: "bucket count must be a non-zero power of two",
                });
            }
        }
        Ok(())
    }

    /// Width of the widest segment a run up to `bound` will process
    #[inline]
    pub fn effective_stride(&self, bound: u64) -> u64 {
        self.stride.min(bound)
    }

    /// Upper estimate of sums landing in one segment of a run up to `bound`
    ///
    /// The first segment `(0, S]` is always the densest.
    pub fn expected_sums(&self, bound: u64) -> usize {
        expected_sums(self.effective_stride(bound))
    }

    /// Bucket count for a run up to `bound`
    ///
    /// Uses the pinned value if any, otherwise sizes the table for
    /// [`TARGET_LOAD`] entries per bucket in the densest segment.
    pub fn bucket_count_for(&self, bound: u64) -> usize {
        self.bucket_count.unwrap_or_else(|| {
            let target = (self.expected_sums(bound) as f64 / TARGET_LOAD).ceil() as usize;
            target
                .max(1)
                .checked_next_power_of_two()
                .unwrap_or(MAX_BUCKETS)
                .clamp(MIN_BUCKETS, MAX_BUCKETS)
        })
    }
}

/// Upper estimate of pairs `j <= i` whose sum falls in a window of `width`
/// values starting at zero
pub fn expected_sums(width: u64) -> usize {
    (CUBE_SUM_DENSITY * (width as f64).powf(2.0 / 3.0)).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.stride, DEFAULT_STRIDE);
        assert_eq!(config.bucket_count, None);
        assert_eq!(config.strategy, Strategy::Hash);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_stride(1000)
            .with_bucket_count(64)
            .with_strategy(Strategy::Sort);
        assert_eq!(config.stride, 1000);
        assert_eq!(config.bucket_count_for(u64::MAX), 64);
        assert_eq!(config.strategy, Strategy::Sort);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            Config::default().with_stride(0).validate(),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            Config::default().with_bucket_count(48).validate(),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            Config::default().with_bucket_count(0).validate(),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(Config::default().with_bucket_count(1).validate().is_ok());
    }

    #[test]
    fn test_expected_sums_matches_pair_count() {
        // actual count of pairs 1 <= j <= i with i^3 + j^3 <= 10^6
        let actual = (1u64..=100)
            .flat_map(|i| (1..=i).map(move |j| i * i * i + j * j * j))
            .filter(|&s| s <= 1_000_000)
            .count();
        let estimate = expected_sums(1_000_000);

        let error = (estimate as f64 - actual as f64).abs() / actual as f64;
        assert!(error < 0.05, "estimate {} vs actual {}", estimate, actual);
    }

    #[test]
    fn test_derived_bucket_count() {
        let config = Config::default();

        assert_eq!(config.bucket_count_for(100), MIN_BUCKETS);

        // 70 expected sums below 2000, 18 buckets at the target load
        let small = config.bucket_count_for(2000);
        assert_eq!(small, 32);

        let large = config.bucket_count_for(u64::MAX);
        assert!(large.is_power_of_two());
        // 0.4417 * (4e8)^(2/3) / 4 ~ 60k
        assert_eq!(large, 65_536);

        assert!(config.bucket_count_for(10_000_000) <= large);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Hash.to_string(), "hash");
        assert_eq!(Strategy::Sort.to_string(), "sort");
    }
}
