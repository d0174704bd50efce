//! Segmented enumeration of cube sums.
//!
//! For each segment `(from, to]` the engine walks `i` downward from
//! `i_max` to `i_min` and, for each `i`, walks `j` upward from a running
//! `j_min` while `i^3 + j^3 <= to` and `j <= i`. The first `j` whose sum
//! passes `from` seeds `j_min` for the next (smaller) `i`: the valid range
//! of `j` only moves up as `i` decreases.

use log::{debug, info};

use crate::aggregate::{Aggregator, HashAggregator, SortAggregator, Tally};
use crate::config::{Config, Strategy};
use crate::cube::{checked_cube, ensure_enumerable, pair_sum};
use crate::error::{Error, Result};
use crate::iter::Segments;
use crate::report::Report;
use crate::segment::Segment;

/// Outcome of one segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentRun {
    /// Ramanujan numbers inside the segment
    pub tally: Tally,
    /// Pair sums evaluated
    pub sums: u64,
}

/// Enumerate every pair `1 <= j <= i` whose cube sum lies in `segment`,
/// feed the sums to `aggregator` and close the segment
///
/// The aggregator is reset on return, on success and on error alike, so
/// calling this twice on the same segment yields the same result.
pub fn count_segment<A>(segment: Segment, aggregator: &mut A) -> Result<SegmentRun>
where
    A: Aggregator + ?Sized,
{
    let sums = match enumerate_segment(segment, aggregator) {
        Ok(sums) => sums,
        Err(err) => {
            // leave the aggregator clean for the caller
            let _ = aggregator.finish_segment();
            return Err(err);
        }
    };

    let tally = aggregator.finish_segment()?;
    Ok(SegmentRun { tally, sums })
}

/// Feed every in-segment sum to `aggregator`, returning the pairs evaluated
fn enumerate_segment<A>(segment: Segment, aggregator: &mut A) -> Result<u64>
where
    A: Aggregator + ?Sized,
{
    let mut sums = 0u64;

    if let Some(bounds) = segment.bounds() {
        let (from, to) = (segment.from(), segment.to());
        let mut j_min = 1u64;

        for i in bounds.descending() {
            let i_cube = checked_cube(i).ok_or(Error::Overflow { bound: to })?;
            let mut found_valid = false;
            let mut j = j_min;
            let mut sum = pair_sum(i_cube, j, to)?;

            while sum <= to && j <= i {
                sums += 1;
                if from < sum {
                    if !found_valid {
                        found_valid = true;
                        j_min = j;
                    }
                    aggregator.record(sum)?;
                }
                j += 1;
                sum = pair_sum(i_cube, j, to)?;
            }
        }
    }

    Ok(sums)
}

/// Drives segmentation and aggregation for a configuration
#[derive(Clone, Debug)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create an engine, rejecting invalid configurations
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segments a run up to `bound` processes
    #[inline]
    pub fn segments(&self, bound: u64) -> Segments {
        Segments::new(bound, self.config.stride)
    }

    /// Build the configured aggregator, sized for a run up to `bound`
    pub fn aggregator(&self, bound: u64) -> Result<Box<dyn Aggregator + Send>> {
        let aggregator: Box<dyn Aggregator + Send> = match self.config.strategy {
            Strategy::Hash => Box::new(HashAggregator::new(self.config.bucket_count_for(bound))?),
            Strategy::Sort => Box::new(SortAggregator::with_capacity(
                self.config.expected_sums(bound),
            )?),
        };
        Ok(aggregator)
    }

    /// Count Ramanujan numbers up to `bound`, one segment after another
    pub fn run(&self, bound: u64) -> Result<Report> {
        let aggregator = self.aggregator(bound)?;
        self.run_with(bound, aggregator)
    }

    /// Count Ramanujan numbers up to `bound` with a caller-provided
    /// aggregator
    pub fn run_with<A: Aggregator>(&self, bound: u64, mut aggregator: A) -> Result<Report> {
        ensure_enumerable(bound)?;
        info!(
            "counting up to {} with stride {} ({} aggregation)",
            bound, self.config.stride, self.config.strategy
        );

        let mut tally = Tally::default();
        let mut sums = 0u64;
        let mut segments = 0u64;

        for segment in self.segments(bound) {
            let run = count_segment(segment, &mut aggregator)?;
            segments += 1;
            sums += run.sums;
            tally += run.tally;

            debug!(
                "segment {:>4} ({}, {}]: sums = {}, found = {}",
                segments,
                segment.from(),
                segment.to(),
                run.sums,
                run.tally.count
            );
        }

        info!("found {} Ramanujan numbers up to {}", tally.count, bound);

        Ok(Report {
            bound,
            stride: self.config.stride,
            strategy: self.config.strategy,
            tally,
            sums,
            segments,
            occupancy: aggregator.occupancy(),
            table_size: aggregator.table_size(),
            footprint: aggregator.footprint(),
        })
    }

    /// Count Ramanujan numbers up to `bound`, segments spread over the rayon
    /// pool
    ///
    /// Every worker owns its aggregator; tallies are added up. Occupancy and
    /// footprint report the largest single aggregator.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self, bound: u64) -> Result<Report> {
        use rayon::prelude::*;

        ensure_enumerable(bound)?;
        info!(
            "counting up to {} with stride {} ({} aggregation, {} threads)",
            bound,
            self.config.stride,
            self.config.strategy,
            rayon::current_num_threads()
        );

        let segments: Vec<Segment> = self.segments(bound).collect();

        let partials = segments
            .into_par_iter()
            .map_init(
                || self.aggregator(bound),
                |aggregator, segment| -> Result<Partial> {
                    let aggregator = aggregator.as_mut().map_err(|e| e.clone())?;
                    let run = count_segment(segment, &mut **aggregator)?;
                    Ok(Partial {
                        run,
                        segments: 1,
                        occupancy: aggregator.occupancy(),
                        table_size: aggregator.table_size(),
                        footprint: aggregator.footprint(),
                    })
                },
            )
            .try_reduce(Partial::default, |a, b| Ok(a.merge(b)))?;

        info!(
            "found {} Ramanujan numbers up to {}",
            partials.run.tally.count, bound
        );

        Ok(Report {
            bound,
            stride: self.config.stride,
            strategy: self.config.strategy,
            tally: partials.run.tally,
            sums: partials.run.sums,
            segments: partials.segments,
            occupancy: partials.occupancy,
            table_size: partials.table_size,
            footprint: partials.footprint,
        })
    }
}

/// Combined results of a group of segments
#[cfg(feature = "parallel")]
#[derive(Default)]
struct Partial {
    run: SegmentRun,
    segments: u64,
    occupancy: usize,
    table_size: usize,
    footprint: usize,
}

#[cfg(feature = "parallel")]
impl Partial {
    fn merge(self, other: Partial) -> Partial {
        Partial {
            run: SegmentRun {
                tally: self.run.tally + other.run.tally,
                sums: self.run.sums + other.run.sums,
            },
            segments: self.segments + other.segments,
            occupancy: self.occupancy.max(other.occupancy),
            table_size: self.table_size.max(other.table_size),
            footprint: self.footprint.max(other.footprint),
        }
    }
}
