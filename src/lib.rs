//! Bounded-memory counting of numbers expressible as a sum of two positive
//! cubes in two or more ways (1729 = 1^3 + 12^3 = 9^3 + 10^3).
//!
//! The value range `(0, N]` is processed in fixed-width segments. For each
//! segment the engine enumerates only the pairs `(i, j)` whose cube sum can
//! land inside it and hands every sum to an [`Aggregator`]:
//!
//! - [`HashAggregator`]: streaming insert-and-count in a paged hash set
//!   ([`SumTable`]) that is reset, not freed, between segments
//! - [`SortAggregator`]: collects the segment's sums, sorts and scans runs
//!
//! ```
//! use taxicab::{Config, Engine};
//!
//! let engine = Engine::new(Config::default()).unwrap();
//! let report = engine.run(20_000).unwrap();
//! assert_eq!(report.found(), 3); // 1729, 4104, 13832
//! ```

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod cube;
pub mod engine;
pub mod entry;
mod error;
pub mod hash;
pub mod iter;
pub mod report;
pub mod segment;
mod sort;
pub mod table;

pub use aggregate::{Aggregator, HashAggregator, SortAggregator, Tally};
pub use config::{Config, Strategy};
pub use engine::{count_segment, Engine, SegmentRun};
pub use error::{Error, Result};
pub use report::Report;
pub use segment::Segment;
pub use table::SumTable;
