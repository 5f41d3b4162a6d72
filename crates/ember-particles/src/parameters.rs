//! Release parameters: per-property value generators applied at spawn time

use crate::rand::ParticleRng;
use ember_core::{HslColor, Vec2};
use std::f32::consts::PI;
use std::hash::{Hash, Hasher};

/// A value type a [`ReleaseParameter`] can produce
pub trait Sample: Copy + PartialEq {
    /// Uniform draw between `min` and `max` (component-wise for vectors)
    fn sample(min: Self, max: Self, rng: &mut ParticleRng) -> Self;

    /// Feed the value's bits to a hasher, consistently with `PartialEq`
    fn hash_value<H: Hasher>(&self, state: &mut H);
}

// `0.0 == -0.0`, so both must hash the same
fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    (value + 0.0).to_bits().hash(state);
}

impl Sample for f32 {
    fn sample(min: Self, max: Self, rng: &mut ParticleRng) -> Self {
        rng.range(min, max)
    }

    fn hash_value<H: Hasher>(&self, state: &mut H) {
        hash_f32(*self, state);
    }
}

impl Sample for u32 {
    /// Inclusive on both ends
    fn sample(min: Self, max: Self, rng: &mut ParticleRng) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        lo + rng.below(hi - lo + 1)
    }

    fn hash_value<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl Sample for Vec2 {
    fn sample(min: Self, max: Self, rng: &mut ParticleRng) -> Self {
        Vec2::new(rng.range(min.x, max.x), rng.range(min.y, max.y))
    }

    fn hash_value<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.x, state);
        hash_f32(self.y, state);
    }
}

impl Sample for HslColor {
    fn sample(min: Self, max: Self, rng: &mut ParticleRng) -> Self {
        HslColor::new(
            rng.range(min.h, max.h),
            rng.range(min.s, max.s),
            rng.range(min.l, max.l),
        )
    }

    fn hash_value<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.h, state);
        hash_f32(self.s, state);
        hash_f32(self.l, state);
    }
}

/// Either a fixed value or a fresh uniform draw on every read.
///
/// Equality looks at the variant first: `Constant(5.0)` never equals
/// `Random { min: 5.0, max: 5.0 }` even though both always yield 5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseParameter<T: Sample> {
    Constant(T),
    Random { min: T, max: T },
}

impl<T: Sample> ReleaseParameter<T> {
    pub fn random(min: T, max: T) -> Self {
        Self::Random { min, max }
    }

    /// Resolve a value. `Random` is never cached.
    pub fn value(&self, rng: &mut ParticleRng) -> T {
        match *self {
            Self::Constant(v) => v,
            Self::Random { min, max } => T::sample(min, max, rng),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

impl<T: Sample> Hash for ReleaseParameter<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Constant(v) => v.hash_value(state),
            Self::Random { min, max } => {
                min.hash_value(state);
                max.hash_value(state);
            }
        }
    }
}

impl<T: Sample> From<T> for ReleaseParameter<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

/// Initial values for every particle an emitter releases
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct ReleaseParameters {
    /// Particles per trigger
    pub quantity: ReleaseParameter<u32>,
    pub speed: ReleaseParameter<f32>,
    pub color: ReleaseParameter<HslColor>,
    pub opacity: ReleaseParameter<f32>,
    pub scale: ReleaseParameter<Vec2>,
    /// Radians
    pub rotation: ReleaseParameter<f32>,
    pub mass: ReleaseParameter<f32>,
}

impl Default for ReleaseParameters {
    fn default() -> Self {
        Self {
            quantity: ReleaseParameter::Constant(1),
            speed: ReleaseParameter::random(-1.0, 1.0),
            color: ReleaseParameter::Constant(HslColor::WHITE),
            opacity: ReleaseParameter::random(0.0, 1.0),
            scale: ReleaseParameter::Constant(Vec2::ONE),
            rotation: ReleaseParameter::random(-PI, PI),
            mass: ReleaseParameter::Constant(1.0),
        }
    }
}
