//! Seeded gameplay RNG
//!
//! A small linear-congruential generator (Numerical Recipes constants) over
//! 32-bit state. Every gameplay-affecting draw - platform widths, target
//! heights, the reachability solver's descent discount - goes through one
//! instance of this, so a run is fully reproducible from its seed. The
//! sequence is a behavioral contract: the golden generator test depends on
//! these exact constants and the modulo-2^32 wraparound.

use serde::{Deserialize, Serialize};

/// Deterministic LCG random source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRng {
    seed: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Advance the state and return the raw 32-bit seed
    pub fn next_seed(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn random(&mut self) -> f64 {
        f64::from(self.next_seed()) / 4_294_967_296.0
    }

    /// Uniform integer in [min, max], inclusive on both ends
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        (self.random() * (max - min + 1) as f64).floor() as i64 + min
    }

    /// Uniform float in [min, max)
    pub fn random_float(&mut self, min: f64, max: f64) -> f64 {
        self.random() * (max - min) + min
    }
}
