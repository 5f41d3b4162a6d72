//! Per-particle modifiers and their frequency-distributed scheduling
//!
//! A [`Modifier`] does not touch every particle every frame. It targets a
//! logical `frequency` of full-buffer passes per second and, each frame,
//! processes the slice of the buffer that the elapsed time entitles it to,
//! resuming where the previous frame stopped. The domain update always
//! receives the fixed `cycle_time` step, so results do not depend on the
//! host frame rate.

mod color;
mod containers;
mod forces;
mod interpolators;

pub use color::{OpacityFastFade, VelocityColor};
pub use containers::{CircleContainer, RectangleContainer, RectangleLoopContainer};
pub use forces::{Drag, LinearGravity, Rotation, Vortex};
pub use interpolators::{lerp_f32, AgeModifier, Interpolator, VelocityModifier};

use crate::particle::{Particle, ParticleBuffer, ParticleIterator};
use ember_core::{EmberError, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Smallest per-task slice handed to rayon
const PARALLEL_MIN_LEN: usize = 256;

/// Pure per-particle transformation
pub trait ParticleModifier: Sync {
    fn apply(&self, elapsed_seconds: f32, particle: &mut Particle);
}

/// Closed set of modifier algorithms
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierKind {
    LinearGravity(LinearGravity),
    Drag(Drag),
    Rotation(Rotation),
    RectangleContainer(RectangleContainer),
    RectangleLoopContainer(RectangleLoopContainer),
    CircleContainer(CircleContainer),
    Vortex(Vortex),
    OpacityFastFade(OpacityFastFade),
    VelocityColor(VelocityColor),
    Age(AgeModifier),
    Velocity(VelocityModifier),
}

// Resolve the variant once, then run a monomorphized loop over the particles.
macro_rules! dispatch {
    ($kind:expr, $m:ident => $body:expr) => {
        match $kind {
            ModifierKind::LinearGravity($m) => $body,
            ModifierKind::Drag($m) => $body,
            ModifierKind::Rotation($m) => $body,
            ModifierKind::RectangleContainer($m) => $body,
            ModifierKind::RectangleLoopContainer($m) => $body,
            ModifierKind::CircleContainer($m) => $body,
            ModifierKind::Vortex($m) => $body,
            ModifierKind::OpacityFastFade($m) => $body,
            ModifierKind::VelocityColor($m) => $body,
            ModifierKind::Age($m) => $body,
            ModifierKind::Velocity($m) => $body,
        }
    };
}

impl ModifierKind {
    /// Apply to the next `count` particles of `iterator`
    pub fn update(&self, elapsed_seconds: f32, iterator: &mut ParticleIterator<'_>, count: usize) {
        dispatch!(self, m => run_serial(m, elapsed_seconds, iterator, count))
    }

    /// Apply to every particle of `particles`, spread over the rayon pool
    pub fn update_parallel(&self, elapsed_seconds: f32, particles: &mut [Particle]) {
        dispatch!(self, m => run_parallel(m, elapsed_seconds, particles))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModifierKind::LinearGravity(_) => "linear_gravity",
            ModifierKind::Drag(_) => "drag",
            ModifierKind::Rotation(_) => "rotation",
            ModifierKind::RectangleContainer(_) => "rectangle_container",
            ModifierKind::RectangleLoopContainer(_) => "rectangle_loop_container",
            ModifierKind::CircleContainer(_) => "circle_container",
            ModifierKind::Vortex(_) => "vortex",
            ModifierKind::OpacityFastFade(_) => "opacity_fast_fade",
            ModifierKind::VelocityColor(_) => "velocity_color",
            ModifierKind::Age(_) => "age",
            ModifierKind::Velocity(_) => "velocity",
        }
    }
}

fn run_serial<M: ParticleModifier>(
    modifier: &M,
    elapsed_seconds: f32,
    iterator: &mut ParticleIterator<'_>,
    count: usize,
) {
    for _ in 0..count {
        let Some(particle) = iterator.next_mut() else {
            break;
        };
        modifier.apply(elapsed_seconds, particle);
    }
}

fn run_parallel<M: ParticleModifier>(
    modifier: &M,
    elapsed_seconds: f32,
    particles: &mut [Particle],
) {
    particles
        .par_iter_mut()
        .with_min_len(PARALLEL_MIN_LEN)
        .for_each(|particle| modifier.apply(elapsed_seconds, particle));
}

macro_rules! impl_from_kind {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ModifierKind {
                fn from(m: $ty) -> Self {
                    ModifierKind::$variant(m)
                }
            }

            impl From<$ty> for Modifier {
                fn from(m: $ty) -> Self {
                    Modifier::new(m)
                }
            }
        )*
    };
}

impl_from_kind!(
    LinearGravity(LinearGravity),
    Drag(Drag),
    Rotation(Rotation),
    RectangleContainer(RectangleContainer),
    RectangleLoopContainer(RectangleLoopContainer),
    CircleContainer(CircleContainer),
    Vortex(Vortex),
    OpacityFastFade(OpacityFastFade),
    VelocityColor(VelocityColor),
    Age(AgeModifier),
    Velocity(VelocityModifier),
);

impl From<ModifierKind> for Modifier {
    fn from(kind: ModifierKind) -> Self {
        Modifier::new(kind)
    }
}

/// A modifier algorithm plus its scheduling state
#[derive(Debug, Clone)]
pub struct Modifier {
    pub kind: ModifierKind,
    enabled: bool,
    frequency: f32,
    cycle_time: f32,
    particles_updated_this_cycle: usize,
}

impl Modifier {
    /// Full-buffer passes per second unless configured otherwise
    pub const DEFAULT_FREQUENCY: f32 = 60.0;

    pub fn new(kind: impl Into<ModifierKind>) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            frequency: Self::DEFAULT_FREQUENCY,
            cycle_time: 1.0 / Self::DEFAULT_FREQUENCY,
            particles_updated_this_cycle: 0,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Result<Self> {
        self.set_frequency(frequency)?;
        Ok(self)
    }

    pub fn set_frequency(&mut self, frequency: f32) -> Result<()> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(EmberError::InvalidArgument(format!(
                "modifier frequency must be positive and finite, got {frequency}"
            )));
        }
        self.frequency = frequency;
        self.cycle_time = 1.0 / frequency;
        Ok(())
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Fixed logical step handed to the domain update
    pub fn cycle_time(&self) -> f32 {
        self.cycle_time
    }

    pub fn particles_updated_this_cycle(&self) -> usize {
        self.particles_updated_this_cycle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Scheduling progress is kept across enable/disable
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance the schedule by one frame and return the buffer range this
    /// modifier should process now, if any.
    pub fn schedule(&mut self, elapsed_seconds: f32, total: usize) -> Option<Range<usize>> {
        if !self.enabled || total == 0 {
            return None;
        }

        let remaining = total.saturating_sub(self.particles_updated_this_cycle);
        let cycles = f64::from(elapsed_seconds) / f64::from(self.cycle_time);
        let budget = (cycles * total as f64).ceil();
        // negative or NaN budgets saturate to zero
        let to_update = remaining.min(budget as usize);

        let window = if to_update > 0 {
            let start = self.particles_updated_this_cycle;
            self.particles_updated_this_cycle += to_update;
            Some(start..start + to_update)
        } else {
            None
        };

        if self.particles_updated_this_cycle >= total {
            self.particles_updated_this_cycle = 0;
        }
        window
    }

    /// One frame on the calling thread
    pub fn update(&mut self, elapsed_seconds: f32, buffer: &mut ParticleBuffer) {
        if let Some(window) = self.schedule(elapsed_seconds, buffer.total()) {
            let mut iterator = buffer.iter_from(window.start);
            self.kind.update(self.cycle_time, &mut iterator, window.len());
        }
    }

    /// One frame with this modifier's window split across the rayon pool
    pub fn update_parallel(&mut self, elapsed_seconds: f32, buffer: &mut ParticleBuffer) {
        if let Some(window) = self.schedule(elapsed_seconds, buffer.total()) {
            self.kind
                .update_parallel(self.cycle_time, &mut buffer.live_mut()[window]);
        }
    }
}
