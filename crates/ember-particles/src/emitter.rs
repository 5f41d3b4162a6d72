//! Emitter: one particle buffer plus the rules that spawn and evolve it

use crate::execution::ExecutionStrategy;
use crate::modifiers::Modifier;
use crate::parameters::ReleaseParameters;
use crate::particle::{Particle, ParticleBuffer};
use crate::profile::Profile;
use crate::rand::ParticleRng;
use ember_core::{EmberError, Result, Vec2};

/// Blend mode for particle rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleBlendMode {
    #[default]
    Alpha,
    Additive,
}

pub struct Emitter {
    pub name: String,
    /// Spawn origin relative to the position passed to `trigger`
    pub offset: Vec2,
    pub profile: Profile,
    pub parameters: ReleaseParameters,
    /// Applied in order each frame
    pub modifiers: Vec<Modifier>,
    pub blend_mode: ParticleBlendMode,
    /// Texture key for the renderer
    pub texture: String,
    life_span: f32,
    strategy: ExecutionStrategy,
    buffer: ParticleBuffer,
    total_seconds: f32,
}

impl Emitter {
    /// `life_span` is in seconds
    pub fn new(capacity: usize, life_span: f32, profile: Profile) -> Result<Self> {
        if capacity == 0 {
            return Err(EmberError::InvalidArgument(
                "emitter capacity must be at least 1".to_string(),
            ));
        }
        check_life_span(life_span)?;
        Ok(Self {
            name: String::new(),
            offset: Vec2::ZERO,
            profile,
            parameters: ReleaseParameters::default(),
            modifiers: Vec::new(),
            blend_mode: ParticleBlendMode::Alpha,
            texture: String::new(),
            life_span,
            strategy: ExecutionStrategy::Serial,
            buffer: ParticleBuffer::new(capacity),
            total_seconds: 0.0,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_parameters(mut self, parameters: ReleaseParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<Modifier>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn with_texture(
        mut self,
        texture: impl Into<String>,
        blend_mode: ParticleBlendMode,
    ) -> Self {
        self.texture = texture.into();
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.set_execution_strategy(strategy);
        self
    }

    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn set_execution_strategy(&mut self, strategy: ExecutionStrategy) {
        if strategy != self.strategy {
            log::debug!(
                "emitter '{}' switching modifier execution to {:?}",
                self.name,
                strategy
            );
        }
        self.strategy = strategy;
    }

    pub fn life_span(&self) -> f32 {
        self.life_span
    }

    pub fn set_life_span(&mut self, life_span: f32) -> Result<()> {
        check_life_span(life_span)?;
        self.life_span = life_span;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Read-only view for renderers
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn active_particles(&self) -> usize {
        self.buffer.total()
    }

    /// Seconds this emitter has been updated for
    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    /// Release `parameters.quantity` particles at `position + offset`.
    /// Returns how many were actually spawned.
    pub fn trigger(&mut self, position: Vec2, layer_depth: f32, rng: &mut ParticleRng) -> usize {
        let quantity = self.parameters.quantity.value(rng) as usize;
        self.release(position, quantity, layer_depth, rng)
    }

    /// Like [`trigger`](Self::trigger) with an explicit particle count
    pub fn trigger_count(
        &mut self,
        position: Vec2,
        count: usize,
        layer_depth: f32,
        rng: &mut ParticleRng,
    ) -> usize {
        self.release(position, count, layer_depth, rng)
    }

    fn release(
        &mut self,
        position: Vec2,
        count: usize,
        layer_depth: f32,
        rng: &mut ParticleRng,
    ) -> usize {
        let origin = position + self.offset;
        let spawnable = count.min(self.buffer.available());
        if spawnable < count {
            log::trace!(
                "emitter '{}' full: dropping {} of {} particles",
                self.name,
                count - spawnable,
                count
            );
        }

        for _ in 0..spawnable {
            let (offset, heading) = self.profile.offset_and_heading(rng);
            let params = &self.parameters;
            let particle = Particle {
                inception: self.total_seconds,
                age: 0.0,
                position: origin + offset,
                velocity: heading * params.speed.value(rng),
                scale: params.scale.value(rng),
                triggered_position: origin,
                color: params.color.value(rng),
                opacity: params.opacity.value(rng),
                rotation: params.rotation.value(rng),
                mass: params.mass.value(rng),
                layer_depth,
            };
            let Some(slot) = self.buffer.spawn() else {
                break;
            };
            *slot = particle;
        }
        spawnable
    }

    /// Age and move live particles, retire the expired ones, then run the
    /// modifiers.
    pub fn update(&mut self, elapsed_seconds: f32) {
        self.total_seconds += elapsed_seconds;
        if self.buffer.is_empty() {
            return;
        }

        let age_step = elapsed_seconds / self.life_span;
        for particle in self.buffer.live_mut() {
            particle.age += age_step;
            particle.position += particle.velocity * elapsed_seconds;
            // a corrupted particle is dropped instead of lingering as NaN
            if !particle.position.is_finite() || !particle.velocity.is_finite() {
                particle.age = 1.0;
            }
        }
        self.buffer.retire_expired();

        self.strategy
            .execute(&mut self.modifiers, elapsed_seconds, &mut self.buffer);
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

fn check_life_span(life_span: f32) -> Result<()> {
    if !life_span.is_finite() || life_span <= 0.0 {
        return Err(EmberError::InvalidArgument(format!(
            "emitter life span must be positive and finite, got {life_span}"
        )));
    }
    Ok(())
}
