//! Seeded noise source for sensor simulation.
//!
//! Wraps a small PRNG with deterministic seeding support so a single run
//! seed reproduces every measurement flip.

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Uniform};

/// Noise generator with configurable seed for reproducibility.
#[derive(Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new noise generator.
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Wrap an already-seeded PRNG, so the run seed can drive both the
    /// layout generation and the measurement noise.
    pub fn from_rng(rng: SmallRng) -> Self {
        Self { rng }
    }

    /// Generate uniform random in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        Uniform::new(0.0f32, 1.0).sample(&mut self.rng)
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            return false;
        }
        self.uniform() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_seed() {
        let mut noise1 = NoiseGenerator::new(42);
        let mut noise2 = NoiseGenerator::new(42);

        for _ in 0..100 {
            assert_eq!(noise1.uniform(), noise2.uniform());
        }
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut noise = NoiseGenerator::new(42);
        for _ in 0..100 {
            assert!(!noise.chance(0.0));
        }
    }

    #[test]
    fn test_chance_probability() {
        let mut noise = NoiseGenerator::new(42);
        let mut count = 0;
        let trials = 10000;

        for _ in 0..trials {
            if noise.chance(0.3) {
                count += 1;
            }
        }

        let ratio = count as f32 / trials as f32;
        assert!((ratio - 0.3).abs() < 0.05); // Within 5% of expected
    }
}
