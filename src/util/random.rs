//! Injectable randomness for dungeon durations and generator batches.
//!
//! Each task owns its own [`RandomSource`], so draws never contend on a
//! shared generator. Seeding the simulation makes every stream reproducible.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws a simulation task needs.
pub trait RandomSource: Send {
    /// Uniform draw from an inclusive range.
    fn uniform(&mut self, range: RangeInclusive<u32>) -> u32;

    /// Bernoulli trial succeeding with `probability` (clamped to `[0, 1]`).
    fn chance(&mut self, probability: f64) -> bool;
}

/// [`RandomSource`] backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic source from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Independent stream `stream` derived from an optional base seed.
    #[must_use]
    pub fn for_stream(seed: Option<u64>, stream: u64) -> Self {
        seed.map_or_else(Self::from_os, |seed| {
            // splitmix64 golden-gamma spacing between streams
            Self::from_seed(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        })
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, range: RangeInclusive<u32>) -> u32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.random_range(range)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }
}
