//! Seedable linear-congruential PRNG used for spawn sampling
//!
//! Each generator is plain owned state. Anything that runs on its own thread
//! (or simply needs an independent stream) takes a [`ParticleRng::fork`]
//! instead of sharing one.

use ember_core::Vec2;
use std::f32::consts::PI;

const MULTIPLIER: u32 = 214_013;
const INCREMENT: u32 = 2_531_011;
const MODULUS_MASK: u32 = 0x7FFF_FFFF;
const OUTPUT_MAX: u32 = 0x7FFF;

#[derive(Debug, Clone)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    /// Seeds are reduced modulo 2^31; a zero seed becomes 1.
    pub fn new(seed: u32) -> Self {
        let seed = seed & MODULUS_MASK;
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw 15-bit output in `[0, 32767]`
    pub fn next_raw(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MODULUS_MASK;
        (self.state >> 16) & OUTPUT_MAX
    }

    /// Returns a float in [0, 1]
    pub fn next_f32(&mut self) -> f32 {
        self.next_raw() as f32 / OUTPUT_MAX as f32
    }

    /// Returns a float in [min, max]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an integer in `[0, n)`, or 0 when `n == 0`
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        ((self.next_f32() * n as f32) as u32).min(n - 1)
    }

    /// Returns an angle in [-PI, PI] radians
    pub fn angle(&mut self) -> f32 {
        self.range(-PI, PI)
    }

    /// Returns a uniformly distributed unit direction
    pub fn unit_vector(&mut self) -> Vec2 {
        Vec2::from_angle(self.angle())
    }

    /// Derive an independent generator, advancing this one.
    pub fn fork(&mut self) -> Self {
        let seed = (self.next_raw() << 15) | self.next_raw();
        Self::new(seed)
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
