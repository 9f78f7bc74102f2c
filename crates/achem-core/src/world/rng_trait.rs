//! RNG trait abstraction for the simulation
//!
//! Allows the simulator and mutation operators to work with:
//! - a seeded RNG for reproducible runs and tests
//! - Rust's thread_rng() for ad-hoc use

use rand::distributions::WeightedIndex;
use rand_distr::{Distribution, StandardNormal};

/// Random number generator trait for simulation and mutation
pub trait SimRng {
    /// Random boolean with 50% probability
    fn coin_flip(&mut self) -> bool;

    /// Random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Uniform index in [0, len). `len` must be non-zero.
    fn gen_index(&mut self, len: usize) -> usize;

    /// Sample from the standard normal distribution
    fn gen_gaussian(&mut self) -> f64;

    /// Index picked with probability proportional to its weight.
    /// None when every weight is zero or the slice is empty.
    fn gen_weighted(&mut self, weights: &[u32]) -> Option<usize>;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> SimRng for T {
    fn coin_flip(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        rand::Rng::gen_range(self, 0..len)
    }

    fn gen_gaussian(&mut self) -> f64 {
        StandardNormal.sample(self)
    }

    fn gen_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        WeightedIndex::new(weights).ok().map(|dist| dist.sample(self))
    }
}
