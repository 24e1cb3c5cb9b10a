//! Random position source
//!
//! Spawn and recycle positions come from a `RangeRng` so tests can swap the
//! seeded generator for a scripted one.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniformly distributed integers over a closed range
pub trait RangeRng {
    /// Uniform integer in `lo..=hi`. Callers guarantee `lo <= hi`.
    fn uniform(&mut self, lo: i32, hi: i32) -> i32;

    /// Uniform integer in the half-open range `lo..hi`.
    ///
    /// A degenerate range (`hi <= lo`) is widened to `lo..lo + 1` instead of
    /// panicking, so a tiny viewport still yields a valid position.
    fn span(&mut self, lo: i32, hi: i32) -> i32 {
        let hi = hi.max(lo.saturating_add(1));
        self.uniform(lo, hi - 1)
    }
}

impl RangeRng for Pcg32 {
    fn uniform(&mut self, lo: i32, hi: i32) -> i32 {
        self.random_range(lo..=hi)
    }
}

/// Build the game's generator from a seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
