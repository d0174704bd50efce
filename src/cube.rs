//! Integer cube and cube-root helpers.
//!
//! Roots start from a floating point estimate and are then corrected with
//! exact integer cubes, so they are exact over the whole `u64` range.

use crate::error::{Error, Result};

/// Cube of `n`, or `None` on overflow
#[inline]
pub const fn checked_cube(n: u64) -> Option<u64> {
    match n.checked_mul(n) {
        Some(square) => square.checked_mul(n),
        None => None,
    }
}

/// Largest `r` with `r^3 <= n`
pub fn floor_cbrt(n: u64) -> u64 {
    let mut root = (n as f64).cbrt() as u64;

    while root > 0 && checked_cube(root).map_or(true, |c| c > n) {
        root -= 1;
    }
    while checked_cube(root + 1).is_some_and(|c| c <= n) {
        root += 1;
    }

    root
}

/// Smallest `r` with `r^3 >= n`
pub fn ceil_cbrt(n: u64) -> u64 {
    let root = floor_cbrt(n);
    if checked_cube(root) == Some(n) {
        root
    } else {
        root + 1
    }
}

/// `i^3 + j^3` with overflow reported against `bound`
#[inline]
pub fn pair_sum(i_cube: u64, j: u64, bound: u64) -> Result<u64> {
    checked_cube(j)
        .and_then(|j_cube| j_cube.checked_add(i_cube))
        .ok_or(Error::Overflow { bound })
}

/// Fail fast if enumerating pairs up to `bound` could overflow `u64`
///
/// The enumerator evaluates at most `i^3 + (i + 1)^3` with
/// `i = floor(cbrt(bound))`, one step past the last pair it keeps.
pub fn ensure_enumerable(bound: u64) -> Result<()> {
    let i = floor_cbrt(bound);
    let i_cube = checked_cube(i).ok_or(Error::Overflow { bound })?;
    pair_sum(i_cube, i + 1, bound).map(|_| ())
}
