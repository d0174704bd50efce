//! Batch aggregator: collect a segment's sums, sort, scan for runs.

use std::mem::size_of;

use crate::aggregate::{Aggregator, Tally};
use crate::error::{Error, Result};

/// Flat buffer of one segment's sums
///
/// Trades an `O(n log n)` sort per segment for purely sequential memory
/// access and no hashing.
#[derive(Debug, Default)]
pub struct SortAggregator {
    buffer: Vec<u64>,

    /// Most sums buffered by any single segment
    max_len: usize,
}

impl SortAggregator {
    /// Create an aggregator with no preallocated buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator whose buffer holds `capacity` sums up front
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|source| Error::Allocation {
                requested: capacity,
                source,
            })?;

        Ok(Self { buffer, max_len: 0 })
    }

    /// Sums buffered in the current segment
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no sum is buffered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Largest segment buffered so far
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Append a sum, growing the buffer if needed
    #[inline]
    pub fn collect(&mut self, value: u64) -> Result<()> {
        if self.buffer.len() == self.buffer.capacity() {
            let additional = self.buffer.len().max(1);
            self.buffer
                .try_reserve(additional)
                .map_err(|source| Error::Allocation {
                    requested: self.buffer.len() + additional,
                    source,
                })?;
        }
        self.buffer.push(value);
        Ok(())
    }

    /// Sort the buffered sums and count values occurring two or more times
    ///
    /// Each colliding value counts once however long its run is. The buffer
    /// is emptied afterwards, keeping its capacity.
    pub fn finalize_segment(&mut self) -> Tally {
        self.max_len = self.max_len.max(self.buffer.len());
        self.buffer.sort_unstable();

        let mut tally = Tally::default();
        for run in self.buffer.chunk_by(|a, b| a == b) {
            if run.len() >= 2 {
                tally.record(run[0]);
            }
        }

        self.buffer.clear();
        tally
    }
}

impl Aggregator for SortAggregator {
    #[inline]
    fn record(&mut self, value: u64) -> Result<()> {
        self.collect(value)
    }

    fn finish_segment(&mut self) -> Result<Tally> {
        Ok(self.finalize_segment())
    }

    fn occupancy(&self) -> usize {
        self.max_len
    }

    fn table_size(&self) -> usize {
        self.buffer.capacity()
    }

    fn footprint(&self) -> usize {
        self.buffer.capacity() * size_of::<u64>()
    }
}
