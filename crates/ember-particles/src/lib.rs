//! Ember Particles - 2D particle simulation engine
//!
//! Provides:
//! - Fixed-capacity swap-remove particle buffers, one per emitter
//! - Profile-based spawn geometry and randomized release parameters
//! - Frequency-scheduled modifiers, run serially or across the rayon pool
//! - Effects grouping emitters, with optional automatic triggering
//! - Instance packing of live particles for a renderer

pub mod batch;
pub mod config;
pub mod effect;
pub mod emitter;
pub mod execution;
pub mod modifiers;
pub mod parameters;
pub mod particle;
pub mod profile;
pub mod rand;

use ember_core::{EmberError, Result};

pub use batch::{ParticleBatch, ParticleDrawData, ParticleInstance};
pub use config::ParticleSettings;
pub use effect::ParticleEffect;
pub use emitter::{Emitter, ParticleBlendMode};
pub use execution::ExecutionStrategy;
pub use modifiers::{Modifier, ModifierKind, ParticleModifier};
pub use parameters::{ReleaseParameter, ReleaseParameters};
pub use particle::{Particle, ParticleBuffer, ParticleIterator};
pub use profile::{CircleRadiation, LineRadiation, Profile};

/// Stable identifier of an effect registered with a [`ParticleSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);

/// Registry of effects driven once per host frame
pub struct ParticleSystem {
    settings: ParticleSettings,
    effects: Vec<(EffectHandle, ParticleEffect)>,
    next_handle: u64,
    batch: ParticleBatch,
    rng: rand::ParticleRng,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_settings(ParticleSettings::default())
    }

    pub fn with_settings(settings: ParticleSettings) -> Self {
        let rng = rand::ParticleRng::new(settings.seed);
        Self {
            settings,
            effects: Vec::new(),
            next_handle: 0,
            batch: ParticleBatch::new(),
            rng,
        }
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    /// Register an effect. It receives its own generator forked from the system's.
    pub fn add_effect(&mut self, mut effect: ParticleEffect) -> Result<EffectHandle> {
        let max = self.settings.max_emitter_capacity;
        if let Some(emitter) = effect.emitters.iter().find(|e| e.capacity() > max) {
            return Err(EmberError::ValueOutOfRange {
                field: format!("{}.{}.capacity", effect.name, emitter.name),
                min: 1.0,
                max: max as f64,
                value: emitter.capacity() as f64,
            });
        }

        if self.settings.force_serial {
            for emitter in &mut effect.emitters {
                if emitter.execution_strategy() == ExecutionStrategy::Parallel {
                    log::warn!(
                        "emitter '{}' of effect '{}' forced to serial execution",
                        emitter.name,
                        effect.name
                    );
                    emitter.set_execution_strategy(ExecutionStrategy::Serial);
                }
            }
        }

        effect.reseed(self.rng.fork());
        let handle = EffectHandle(self.next_handle);
        self.next_handle += 1;
        log::info!(
            "registered effect '{}' with {} emitter(s)",
            effect.name,
            effect.emitters.len()
        );
        self.effects.push((handle, effect));
        Ok(handle)
    }

    pub fn effect(&self, handle: EffectHandle) -> Option<&ParticleEffect> {
        self.effects
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, e)| e)
    }

    pub fn effect_mut(&mut self, handle: EffectHandle) -> Option<&mut ParticleEffect> {
        self.effects
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, e)| e)
    }

    pub fn remove_effect(&mut self, handle: EffectHandle) -> Result<ParticleEffect> {
        let index = self
            .effects
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or_else(|| EmberError::EffectNotFound(format!("handle {}", handle.0)))?;
        let (_, effect) = self.effects.remove(index);
        log::info!("removed effect '{}'", effect.name);
        Ok(effect)
    }

    /// Trigger a registered effect at its current position
    pub fn trigger(&mut self, handle: EffectHandle) -> Result<usize> {
        self.effect_mut(handle)
            .map(ParticleEffect::trigger)
            .ok_or_else(|| EmberError::EffectNotFound(format!("handle {}", handle.0)))
    }

    /// Advance every effect, then repack the draw data
    pub fn update(&mut self, dt: f32) {
        for (_, effect) in &mut self.effects {
            effect.update(dt);
        }
        self.batch.pack(self.effects.iter().map(|(h, e)| (*h, e)));
    }

    /// Draw data packed by the last `update`
    pub fn draw_data(&self) -> Vec<ParticleDrawData<'_>> {
        self.batch.draw_data()
    }

    pub fn instance_data(&self) -> &[ParticleInstance] {
        self.batch.instance_data()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Total live particles across all effects
    pub fn total_alive(&self) -> usize {
        self.effects.iter().map(|(_, e)| e.active_particles()).sum()
    }

    /// Drop every effect and packed instance
    pub fn clear(&mut self) {
        self.effects.clear();
        self.batch.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
