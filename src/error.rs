use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised while configuring or running a count
///
/// Every variant is terminal for the run: there is nothing to retry in a
/// pure batch computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rejected configuration value
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// A bucket or the sort buffer could not grow to the requested capacity
    #[error("could not grow storage to {requested} entries")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// Cube sums near the bound do not fit in 64 bits
    #[error("bound {bound} is too large: cube sums overflow 64-bit integers")]
    Overflow { bound: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
