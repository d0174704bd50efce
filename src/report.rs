//! Summary of a run and its text rendering.

use std::fmt;

use crate::aggregate::Tally;
use crate::config::Strategy;

/// Final counts and diagnostics of one run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Inclusive upper bound
    pub bound: u64,
    /// Segment width
    pub stride: u64,
    /// Aggregation strategy used
    pub strategy: Strategy,
    /// Ramanujan numbers found and their sum
    pub tally: Tally,
    /// Pair sums evaluated
    pub sums: u64,
    /// Segments processed
    pub segments: u64,
    /// Buckets used (hash) or largest segment buffered (sort)
    pub occupancy: usize,
    /// Bucket count (hash) or buffer capacity (sort)
    pub table_size: usize,
    /// Approximate aggregator heap usage in bytes
    pub footprint: usize,
}

impl Report {
    /// Number of Ramanujan numbers up to the bound
    #[inline]
    pub fn found(&self) -> u64 {
        self.tally.count
    }

    /// Sum of all Ramanujan numbers up to the bound
    #[inline]
    pub fn checksum(&self) -> u128 {
        self.tally.checksum
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} Ramanujan numbers up to {}, checksum={}",
            group_thousands(self.found()),
            group_thousands(self.bound),
            group_thousands(self.checksum()),
        )?;
        writeln!(f)?;
        writeln!(f, "    strategy = {:>15}", self.strategy)?;
        writeln!(f, "   occupancy = {:>15}", group_thousands(self.occupancy as u64))?;
        writeln!(f, "        size = {:>15}", group_thousands(self.table_size as u64))?;
        writeln!(f, "        sums = {:>15}", group_thousands(self.sums))?;
        writeln!(f, "    segments = {:>15}", group_thousands(self.segments))?;
        writeln!(f, "      stride = {:>15}", group_thousands(self.stride))?;
        write!(f, "   footprint = {:>15} B", group_thousands(self.footprint as u64))
    }
}

/// Render `n` with `,` between groups of three digits
pub fn group_thousands(n: impl Into<u128>) -> String {
    let digits = n.into().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0u64), "0");
        assert_eq!(group_thousands(999u64), "999");
        assert_eq!(group_thousands(1000u64), "1,000");
        assert_eq!(group_thousands(1729u64), "1,729");
        assert_eq!(group_thousands(400_000_000u64), "400,000,000");
        assert_eq!(group_thousands(12_345_678u64), "12,345,678");
        assert_eq!(
            group_thousands(u128::MAX),
            "340,282,366,920,938,463,463,374,607,431,768,211,455"
        );
    }

    #[test]
    fn test_display() {
        let report = Report {
            bound: 20_000,
            stride: 400_000_000,
            strategy: Strategy::Hash,
            tally: Tally {
                count: 3,
                checksum: 19_665,
            },
            sums: 365,
            segments: 1,
            occupancy: 42,
            table_size: 64,
            footprint: 2048,
        };

        let text = report.to_string();
        assert!(text.starts_with("  3 Ramanujan numbers up to 20,000, checksum=19,665\n"));
        assert!(text.contains("stride =     400,000,000"));
        assert!(text.ends_with("2,048 B"));
    }
}
