//! Injectable randomness for the evolutionary packer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Minimal random source the packers draw from.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_int(&mut self, bound: usize) -> usize;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_float() < p
    }
}

/// Shuffles `items` uniformly in place (Fisher-Yates).
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_int(i + 1);
        items.swap(i, j);
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_float(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_int(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.0.gen_range(0..bound)
        }
    }
}
