//! Bucket (page) of a `SumTable`.
//!
//! - Entries stored contiguously, scanned linearly
//! - Capacity doubles on overflow: 0 -> 1 -> 2 -> 4 -> ...
//! - Reset drops the logical length only, capacity is kept for the next
//!   segment

use log::trace;

use crate::entry::Entry;
use crate::error::{Error, Result};

/// Growable run of entries that hash to the same table slot
///
/// No two entries share a value. Growth preserves insertion order.
#[derive(Debug, Default)]
pub struct Bucket {
    /// Entries of the current segment
    entries: Vec<Entry>,

    /// Capacity following the doubling policy
    ///
    /// Kept separately from `entries.capacity()`, which the allocator may
    /// round up.
    capacity: usize,
}

impl Bucket {
    /// Create new empty bucket without allocating
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            capacity: 0,
        }
    }

    /// Number of entries in the current segment
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if bucket holds no entry in the current segment
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get capacity reserved so far
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the next push needs to grow the bucket
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Find entry holding `value`
    #[inline]
    pub fn find_mut(&mut self, value: u64) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.value() == value)
    }

    /// Get count of `value`, if present
    #[inline]
    pub fn count_of(&self, value: u64) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.value() == value)
            .map(Entry::count)
    }

    /// Append a new entry seen once
    ///
    /// Returns the capacity added by this push (0 when no growth was
    /// needed). The caller must have checked that `value` is absent.
    pub fn push(&mut self, value: u64) -> Result<usize> {
        debug_assert!(self.count_of(value).is_none(), "duplicate value in bucket");

        let grown = if self.is_full() {
            self.grow()?
        } else {
            0
        };

        self.entries.push(Entry::new(value));
        Ok(grown)
    }

    /// Double the capacity, returning the number of slots added
    fn grow(&mut self) -> Result<usize> {
        let new_cap = if self.capacity == 0 {
            1
        } else {
            self.capacity * 2
        };

        self.entries
            .try_reserve_exact(new_cap - self.entries.len())
            .map_err(|source| Error::Allocation {
                requested: new_cap,
                source,
            })?;

        trace!("bucket grown from {} to {} entries", self.capacity, new_cap);

        let added = new_cap - self.capacity;
        self.capacity = new_cap;
        Ok(added)
    }

    /// Forget all entries, keeping the allocation
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Iterate over entries of the current segment in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bucket() {
        let bucket = Bucket::new();
        assert!(bucket.is_empty());
        assert!(bucket.is_full());
        assert_eq!(bucket.len(), 0);
        assert_eq!(bucket.capacity(), 0);
    }

    #[test]
    fn test_push_and_find() {
        let mut bucket = Bucket::new();

        assert_eq!(bucket.push(1729), Ok(1));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.count_of(1729), Some(1));

        let entry = bucket.find_mut(1729).unwrap();
        assert_eq!(entry.bump(), 2);
        assert_eq!(bucket.count_of(1729), Some(2));
        assert!(bucket.find_mut(4104).is_none());
    }

    #[test]
    fn test_capacity_doubles() {
        let mut bucket = Bucket::new();
        let mut capacities = Vec::new();

        for value in 0..9u64 {
            bucket.push(value).unwrap();
            capacities.push(bucket.capacity());
        }

        assert_eq!(capacities, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn test_growth_reports_added_slots() {
        let mut bucket = Bucket::new();
        let added: Vec<usize> = (0..5u64).map(|v| bucket.push(v).unwrap()).collect();
        assert_eq!(added, vec![1, 1, 2, 0, 4]);
        assert_eq!(added.iter().sum::<usize>(), bucket.capacity());
    }

    #[test]
    fn test_growth_preserves_order() {
        let mut bucket = Bucket::new();
        let values = [13832u64, 1729, 20683, 4104, 32832];
        for &value in &values {
            bucket.push(value).unwrap();
        }

        let stored: Vec<u64> = bucket.iter().map(Entry::value).collect();
        assert_eq!(stored, values);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut bucket = Bucket::new();
        for value in 0..5u64 {
            bucket.push(value).unwrap();
        }
        assert_eq!(bucket.capacity(), 8);

        bucket.reset();
        assert!(bucket.is_empty());
        assert_eq!(bucket.capacity(), 8);
        assert_eq!(bucket.count_of(3), None);

        // refilling up to the kept capacity does not grow
        for value in 10..18u64 {
            assert_eq!(bucket.push(value), Ok(0));
        }
        assert_eq!(bucket.capacity(), 8);
    }
}
