//! Random number source used for shuffling.
//!
//! Production code wraps a `rand` generator; tests inject a seeded one or a
//! [`SequenceSource`] that replays fixed draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random draws over small index ranges.
pub trait RandomSource {
    /// Draw an index uniformly from `0..=upper`.
    fn index_up_to(&mut self, upper: usize) -> usize;
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible generator; the same seed yields the same cards.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index_up_to(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Draws larger than the requested bound are clamped to it.
/// An empty list always draws 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    draws: Vec<usize>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(draws: impl Into<Vec<usize>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// A source that always draws `upper`, leaving a Fisher-Yates shuffle
    /// as the identity permutation.
    pub fn identity() -> Self {
        Self::new(vec![usize::MAX])
    }
}

impl RandomSource for SequenceSource {
    fn index_up_to(&mut self, upper: usize) -> usize {
        if self.draws.is_empty() {
            return 0;
        }
        let raw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        raw.min(upper)
    }
}
