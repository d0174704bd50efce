use std::hash::BuildHasher;
use std::mem::size_of;

use crate::bucket::Bucket;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::hash::MulHashState;

/// Paged hash set counting occurrences of cube sums within one segment
///
/// The number of buckets is fixed at construction; only the buckets grow.
/// Between segments, [`SumTable::reset_segment`] forgets every entry but
/// keeps all allocations, so later segments reuse the capacity built up by
/// earlier ones.
pub struct SumTable<S = MulHashState> {
    buckets: Box<[Bucket]>,

    /// `buckets.len() - 1`
    mask: usize,

    /// Buckets that have ever allocated storage
    buckets_used: usize,

    /// Sum of all bucket capacities
    total_capacity: usize,

    /// Distinct values in the current segment
    len: usize,

    hash_builder: S,
}

impl SumTable<MulHashState> {
    /// Create a table with `size` buckets
    ///
    /// `size` must be a non-zero power of two.
    #[inline]
    pub fn new(size: usize) -> Result<Self> {
        Self::with_hasher(size, MulHashState)
    }
}

impl<S> SumTable<S> {
    /// Create a table with `size` buckets and the provided hasher
    pub fn with_hasher(size: usize, hash_builder: S) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(Error::InvalidConfig {
                reason: "bucket count must be a non-zero power of two",
            });
        }

        let buckets = std::iter::repeat_with(Bucket::new).take(size).collect();

        Ok(Self {
            buckets,
            mask: size - 1,
            buckets_used: 0,
            total_capacity: 0,
            len: 0,
            hash_builder,
        })
    }

    /// Returns the number of buckets
    #[inline]
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket mask
    #[inline]
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Returns the number of buckets that have ever held an entry
    #[inline]
    pub fn buckets_used(&self) -> usize {
        self.buckets_used
    }

    /// Returns the total entry capacity across all buckets
    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    /// Returns the number of distinct values in the current segment
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the current segment holds no value
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the hasher
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Length of the longest bucket in the current segment
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Bucket::len).max().unwrap_or(0)
    }

    /// Approximate heap usage in bytes: bucket headers plus entry storage
    #[inline]
    pub fn footprint(&self) -> usize {
        self.size() * size_of::<Bucket>() + self.total_capacity * size_of::<Entry>()
    }

    /// Forget every entry of the current segment, keeping all capacity
    ///
    /// Touches each bucket header once; no entry is visited or freed.
    pub fn reset_segment(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.reset();
        }
        self.len = 0;
    }

    /// Iterate over the entries of the current segment
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.buckets.iter().flat_map(Bucket::iter)
    }
}

impl<S> SumTable<S>
where
    S: BuildHasher,
{
    /// Bucket index for a given value
    #[inline]
    fn bucket_index(&self, value: u64) -> usize {
        (self.hash_builder.hash_one(value) as usize) & self.mask
    }

    /// Record one occurrence of `value`, returning its count so far
    ///
    /// A return of exactly 2 means the value has just been seen for the
    /// second time in this segment.
    pub fn insert_and_count(&mut self, value: u64) -> Result<u64> {
        let idx = self.bucket_index(value);
        let bucket = &mut self.buckets[idx];

        if let Some(entry) = bucket.find_mut(value) {
            return Ok(entry.bump());
        }

        let was_unused = bucket.capacity() == 0;
        let added = bucket.push(value)?;

        if was_unused {
            self.buckets_used += 1;
        }
        self.total_capacity += added;
        self.len += 1;

        Ok(1)
    }

    /// Returns the count of `value` in the current segment
    #[inline]
    pub fn get(&self, value: u64) -> Option<u64> {
        self.buckets[self.bucket_index(value)].count_of(value)
    }

    /// Returns `true` if `value` was seen in the current segment
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        self.get(value).is_some()
    }
}

impl<S> std::fmt::Debug for SumTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SumTable")
            .field("size", &self.size())
            .field("len", &self.len)
            .field("buckets_used", &self.buckets_used)
            .field("total_capacity", &self.total_capacity)
            .finish()
    }
}
