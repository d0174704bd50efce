//! Aggregators turning a stream of cube sums into collision counts.
//!
//! The engine feeds every in-segment sum to one [`Aggregator`] and calls
//! [`Aggregator::finish_segment`] at each segment boundary. Collisions never
//! span segments, so per-segment tallies simply add up.

use std::hash::BuildHasher;
use std::ops::{Add, AddAssign};

use crate::error::Result;
use crate::hash::MulHashState;
use crate::table::SumTable;

pub use crate::sort::SortAggregator;

/// Ramanujan numbers found and their sum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Distinct values with two or more representations
    pub count: u64,
    /// Sum of those values
    pub checksum: u128,
}

impl Tally {
    /// Account for one newly found value
    #[inline]
    pub fn record(&mut self, value: u64) {
        self.count += 1;
        self.checksum += u128::from(value);
    }
}

impl Add for Tally {
    type Output = Tally;

    #[inline]
    fn add(self, rhs: Tally) -> Tally {
        Tally {
            count: self.count + rhs.count,
            checksum: self.checksum + rhs.checksum,
        }
    }
}

impl AddAssign for Tally {
    #[inline]
    fn add_assign(&mut self, rhs: Tally) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::default(), Add::add)
    }
}

/// Per-segment sink for cube sums
pub trait Aggregator {
    /// Feed one sum lying inside the current segment
    fn record(&mut self, value: u64) -> Result<()>;

    /// Close the current segment: return its tally and reset transient
    /// state while keeping allocated capacity
    fn finish_segment(&mut self) -> Result<Tally>;

    /// Occupancy diagnostic (buckets used, or largest segment buffered)
    fn occupancy(&self) -> usize;

    /// Configured table or buffer size
    fn table_size(&self) -> usize;

    /// Approximate heap usage in bytes
    fn footprint(&self) -> usize;
}

/// Streaming aggregator over a [`SumTable`]
///
/// A value is tallied the moment its count reaches exactly 2, so later
/// occurrences never count it again.
#[derive(Debug)]
pub struct HashAggregator<S = MulHashState> {
    table: SumTable<S>,
    pending: Tally,
}

impl HashAggregator<MulHashState> {
    /// Create an aggregator with `buckets` buckets
    pub fn new(buckets: usize) -> Result<Self> {
        Ok(Self::from_table(SumTable::new(buckets)?))
    }
}

impl<S> HashAggregator<S> {
    /// Wrap an existing table
    pub fn from_table(table: SumTable<S>) -> Self {
        Self {
            table,
            pending: Tally::default(),
        }
    }

    /// Get the underlying table
    #[inline]
    pub fn table(&self) -> &SumTable<S> {
        &self.table
    }

    /// Tally of the segment in progress
    #[inline]
    pub fn pending(&self) -> Tally {
        self.pending
    }
}

impl<S: BuildHasher> Aggregator for HashAggregator<S> {
    #[inline]
    fn record(&mut self, value: u64) -> Result<()> {
        if self.table.insert_and_count(value)? == 2 {
            self.pending.record(value);
        }
        Ok(())
    }

    fn finish_segment(&mut self) -> Result<Tally> {
        self.table.reset_segment();
        Ok(std::mem::take(&mut self.pending))
    }

    fn occupancy(&self) -> usize {
        self.table.buckets_used()
    }

    fn table_size(&self) -> usize {
        self.table.size()
    }

    fn footprint(&self) -> usize {
        self.table.footprint()
    }
}

impl<A: Aggregator + ?Sized> Aggregator for Box<A> {
    #[inline]
    fn record(&mut self, value: u64) -> Result<()> {
        (**self).record(value)
    }

    fn finish_segment(&mut self) -> Result<Tally> {
        (**self).finish_segment()
    }

    fn occupancy(&self) -> usize {
        (**self).occupancy()
    }

    fn table_size(&self) -> usize {
        (**self).table_size()
    }

    fn footprint(&self) -> usize {
        (**self).footprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<A: Aggregator>(aggregator: &mut A, values: &[u64]) -> Tally {
        for &value in values {
            aggregator.record(value).unwrap();
        }
        aggregator.finish_segment().unwrap()
    }

    #[test]
    fn test_tally_add() {
        let mut tally = Tally::default();
        tally.record(1729);
        tally += Tally {
            count: 1,
            checksum: 4104,
        };
        assert_eq!(
            tally,
            Tally {
                count: 2,
                checksum: 5833
            }
        );

        let total: Tally = vec![tally, tally].into_iter().sum();
        assert_eq!(total.count, 4);
        assert_eq!(total.checksum, 11666);
    }

    #[test]
    fn test_hash_second_occurrence_counts_once() {
        let mut aggregator = HashAggregator::new(16).unwrap();
        let tally = feed(&mut aggregator, &[1729, 1729, 1729, 1729, 5, 6]);
        assert_eq!(
            tally,
            Tally {
                count: 1,
                checksum: 1729
            }
        );
    }

    #[test]
    fn test_hash_finish_resets() {
        let mut aggregator = HashAggregator::new(16).unwrap();

        let first = feed(&mut aggregator, &[1729, 4104, 1729]);
        assert_eq!(first.count, 1);
        assert!(aggregator.table().is_empty());
        assert_eq!(aggregator.pending(), Tally::default());

        // a value seen once per segment is never a collision
        let second = feed(&mut aggregator, &[4104]);
        assert_eq!(second, Tally::default());
    }

    #[test]
    fn test_hash_diagnostics() {
        let mut aggregator = HashAggregator::new(8).unwrap();
        assert_eq!(aggregator.table_size(), 8);
        assert_eq!(aggregator.occupancy(), 0);

        feed(&mut aggregator, &[1, 2, 3]);
        assert!(aggregator.occupancy() >= 1);
        assert!(aggregator.footprint() > 0);
    }

    #[test]
    fn test_boxed_aggregator() {
        let mut boxed: Box<dyn Aggregator> = Box::new(HashAggregator::new(4).unwrap());
        let tally = feed(&mut boxed, &[7, 7, 9, 9, 9]);
        assert_eq!(
            tally,
            Tally {
                count: 2,
                checksum: 16
            }
        );
    }
}
