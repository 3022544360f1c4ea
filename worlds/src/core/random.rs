//! Bounded pseudo-random draws used for motion jitter. Layout never touches
//! this module; only per-node spin axes and durations are randomized.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of bounded random values. Injected into
/// [`MotionPlan::build`][crate::motion::MotionPlan::build] so tests can pass a
/// seeded or scripted generator instead of relying on ambient global state.
pub trait RandomRange {
    /// Uniform draw in `[min, max)`. Returns `min` when the range is empty.
    fn between(&mut self, min: f32, max: f32) -> f32;

    /// Uniform draw in `[min, max]`.
    fn between_inclusive(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        let t = self.between(0.0, 1.0);
        (min + t * (max - min)).clamp(min, max)
    }

    /// Uniform integer draw in `[min, max]`.
    fn int_between(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        let offset = self.between(0.0, span).floor() as i32;
        min + offset.min(max - min)
    }
}

#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
    seed: Option<u64>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomRange for SeededRandom {
    fn between(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        let value = self.rng.random_range(min..max);
        // f32 rounding in the sampler can land exactly on `max`
        if value >= max { min } else { value }
    }
}
