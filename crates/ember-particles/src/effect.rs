//! Particle effect: a named group of emitters updated and triggered together

use crate::emitter::Emitter;
use crate::execution::ExecutionStrategy;
use crate::rand::ParticleRng;
use ember_core::{EmberError, Result, Vec2};

pub struct ParticleEffect {
    pub name: String,
    /// World position used by `trigger` and auto-triggering
    pub position: Vec2,
    /// Layer depth stamped onto spawned particles
    pub layer_depth: f32,
    pub emitters: Vec<Emitter>,
    auto_trigger: bool,
    auto_trigger_frequency: f32,
    trigger_accumulator: f32,
    rng: ParticleRng,
}

impl ParticleEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec2::ZERO,
            layer_depth: 0.0,
            emitters: Vec::new(),
            auto_trigger: false,
            auto_trigger_frequency: 1.0,
            trigger_accumulator: 0.0,
            rng: ParticleRng::default(),
        }
    }

    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.emitters.push(emitter);
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = ParticleRng::new(seed);
        self
    }

    /// Replace the effect's generator
    pub fn reseed(&mut self, rng: ParticleRng) {
        self.rng = rng;
    }

    /// Trigger every emitter once per `frequency` seconds of update time
    pub fn set_auto_trigger(&mut self, frequency: f32) -> Result<()> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(EmberError::InvalidArgument(format!(
                "auto-trigger frequency must be positive and finite, got {frequency}"
            )));
        }
        self.auto_trigger = true;
        self.auto_trigger_frequency = frequency;
        Ok(())
    }

    pub fn disable_auto_trigger(&mut self) {
        self.auto_trigger = false;
        self.trigger_accumulator = 0.0;
    }

    /// Seconds between automatic triggers, if enabled
    pub fn auto_trigger_frequency(&self) -> Option<f32> {
        self.auto_trigger.then_some(self.auto_trigger_frequency)
    }

    /// Time carried toward the next automatic trigger
    pub fn trigger_accumulator(&self) -> f32 {
        self.trigger_accumulator
    }

    /// Apply one strategy to every emitter
    pub fn set_execution_strategy(&mut self, strategy: ExecutionStrategy) {
        for emitter in &mut self.emitters {
            emitter.set_execution_strategy(strategy);
        }
    }

    /// Trigger every emitter at the effect's position
    pub fn trigger(&mut self) -> usize {
        self.trigger_at(self.position)
    }

    /// Trigger every emitter at `position`. Returns the number of particles spawned.
    pub fn trigger_at(&mut self, position: Vec2) -> usize {
        let layer_depth = self.layer_depth;
        let rng = &mut self.rng;
        self.emitters
            .iter_mut()
            .map(|emitter| emitter.trigger(position, layer_depth, rng))
            .sum()
    }

    /// Advance the effect by one host frame
    pub fn update(&mut self, elapsed_seconds: f32) {
        if self.auto_trigger {
            self.run_auto_trigger(elapsed_seconds);
        }
        for emitter in &mut self.emitters {
            emitter.update(elapsed_seconds);
        }
    }

    // Fires once per whole period in the accumulator, carrying the remainder.
    // Stops early once a trigger can no longer spawn anything.
    fn run_auto_trigger(&mut self, elapsed_seconds: f32) {
        let period = self.auto_trigger_frequency;
        self.trigger_accumulator += elapsed_seconds;
        if !self.trigger_accumulator.is_finite() {
            self.trigger_accumulator = 0.0;
            return;
        }
        if self.trigger_accumulator < period {
            return;
        }

        let remainder = self.trigger_accumulator % period;
        let ticks = ((self.trigger_accumulator - remainder) / period).round() as u64;
        self.trigger_accumulator = remainder;

        for _ in 0..ticks {
            if self.emitters.iter().all(|e| e.buffer().is_full()) {
                break;
            }
            if self.trigger() == 0 {
                break;
            }
        }
    }

    /// Simulate `seconds` ahead in steps of `trigger_period`, triggering at
    /// `position` after each step. Used to pre-warm effects that should not
    /// start empty.
    pub fn fast_forward(
        &mut self,
        position: Vec2,
        seconds: f32,
        trigger_period: f32,
    ) -> Result<()> {
        if !trigger_period.is_finite() || trigger_period <= 0.0 {
            return Err(EmberError::InvalidArgument(format!(
                "fast-forward trigger period must be positive and finite, got {trigger_period}"
            )));
        }
        // negative or NaN durations saturate to zero steps
        let steps = (f64::from(seconds) / f64::from(trigger_period)).ceil() as u64;
        log::debug!(
            "fast-forwarding effect '{}' by {seconds}s in {steps} steps of {trigger_period}s",
            self.name
        );

        for _ in 0..steps {
            self.update(trigger_period);
            self.trigger_at(position);
        }
        Ok(())
    }

    pub fn active_particles(&self) -> usize {
        self.emitters.iter().map(Emitter::active_particles).sum()
    }

    /// Drop every live particle and the pending trigger time
    pub fn clear(&mut self) {
        for emitter in &mut self.emitters {
            emitter.clear();
        }
        self.trigger_accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ReleaseParameter, ReleaseParameters};
    use crate::profile::Profile;

    fn single_emitter(capacity: usize, quantity: u32) -> Emitter {
        Emitter::new(capacity, 100.0, Profile::Point)
            .unwrap()
            .with_parameters(ReleaseParameters {
                quantity: ReleaseParameter::Constant(quantity),
                ..Default::default()
            })
    }

    #[test]
    fn rejects_bad_auto_trigger() {
        let mut effect = ParticleEffect::new("sparks");
        assert!(effect.set_auto_trigger(0.0).is_err());
        assert!(effect.set_auto_trigger(f32::NAN).is_err());
        assert_eq!(effect.auto_trigger_frequency(), None);
        effect.set_auto_trigger(0.5).unwrap();
        assert_eq!(effect.auto_trigger_frequency(), Some(0.5));
    }

    #[test]
    fn no_auto_trigger_means_no_spawns() {
        let mut effect = ParticleEffect::new("idle").with_emitter(single_emitter(10, 1));
        effect.update(5.0);
        assert_eq!(effect.active_particles(), 0);
    }

    #[test]
    fn manual_trigger_uses_effect_position() {
        let mut effect = ParticleEffect::new("dust")
            .with_position(Vec2::new(3.0, 4.0))
            .with_emitter(single_emitter(10, 2));
        effect.layer_depth = 0.5;
        assert_eq!(effect.trigger(), 2);
        for p in effect.emitters[0].buffer().live() {
            assert_eq!(p.triggered_position, Vec2::new(3.0, 4.0));
            assert_eq!(p.layer_depth, 0.5);
        }
    }

    #[test]
    fn trigger_reaches_every_emitter() {
        let mut effect = ParticleEffect::new("burst")
            .with_emitter(single_emitter(10, 2))
            .with_emitter(single_emitter(10, 3));
        assert_eq!(effect.trigger_at(Vec2::ZERO), 5);
        assert_eq!(effect.active_particles(), 5);
    }

    #[test]
    fn auto_trigger_catches_up_with_large_steps() {
        let mut effect = ParticleEffect::new("smoke").with_emitter(single_emitter(100, 1));
        effect.set_auto_trigger(0.1).unwrap();
        effect.update(0.35);
        assert_eq!(effect.active_particles(), 3);
        assert!((effect.trigger_accumulator() - 0.05).abs() < 1e-5);

        effect.update(0.06);
        assert_eq!(effect.active_particles(), 4);
        assert!((effect.trigger_accumulator() - 0.01).abs() < 1e-5);
    }

    #[test]
    fn full_buffers_do_not_spin() {
        let mut effect = ParticleEffect::new("stall").with_emitter(single_emitter(5, 1));
        effect.set_auto_trigger(0.001).unwrap();
        effect.update(10_000.0);
        assert_eq!(effect.active_particles(), 0);
        assert!(effect.trigger_accumulator() < 0.001);
    }

    #[test]
    fn huge_step_with_silent_emitter_returns() {
        let mut effect = ParticleEffect::new("silent").with_emitter(single_emitter(10, 0));
        effect.set_auto_trigger(0.001).unwrap();
        effect.update(100_000.0);
        assert_eq!(effect.active_particles(), 0);
        assert!(effect.trigger_accumulator() >= 0.0);
        assert!(effect.trigger_accumulator() < 0.001);
    }

    #[test]
    fn silent_emitter_does_not_block_others() {
        let mut effect = ParticleEffect::new("mixed")
            .with_emitter(single_emitter(100, 0))
            .with_emitter(single_emitter(100, 1));
        effect.set_auto_trigger(0.1).unwrap();
        effect.update(0.35);
        assert_eq!(effect.active_particles(), 3);
    }

    #[test]
    fn non_finite_step_resets_accumulator() {
        let mut effect = ParticleEffect::new("inf").with_emitter(single_emitter(10, 1));
        effect.set_auto_trigger(0.1).unwrap();
        effect.update(f32::INFINITY);
        assert_eq!(effect.trigger_accumulator(), 0.0);
        effect.update(0.15);
        assert_eq!(effect.active_particles(), 1);
    }

    #[test]
    fn fast_forward_step_count_is_exact() {
        let mut effect = ParticleEffect::new("warm").with_emitter(single_emitter(100, 1));
        effect.fast_forward(Vec2::ZERO, 1.0, 0.25).unwrap();
        assert_eq!(effect.active_particles(), 4);
        assert_eq!(effect.emitters[0].total_seconds(), 1.0);
    }

    #[test]
    fn fast_forward_past_f32_step_precision_returns() {
        // 3e7 steps of 1s: accumulating time in f32 would stall at 2^24
        let mut effect = ParticleEffect::new("long");
        effect.fast_forward(Vec2::ZERO, 3.0e7, 1.0).unwrap();
        assert_eq!(effect.active_particles(), 0);
    }

    #[test]
    fn fast_forward_negative_duration_is_noop() {
        let mut effect = ParticleEffect::new("none").with_emitter(single_emitter(10, 1));
        effect.fast_forward(Vec2::ZERO, -1.0, 0.1).unwrap();
        assert_eq!(effect.active_particles(), 0);
    }

    #[test]
    fn fast_forward_prewarms() {
        let mut effect = ParticleEffect::new("fire").with_emitter(single_emitter(100, 1));
        assert!(effect.fast_forward(Vec2::ZERO, 1.0, 0.0).is_err());
        effect.fast_forward(Vec2::ZERO, 0.5, 0.1).unwrap();
        assert!(effect.active_particles() >= 5);
    }

    #[test]
    fn same_seed_same_effect() {
        let build = || {
            ParticleEffect::new("twin")
                .with_seed(1234)
                .with_emitter(single_emitter(50, 10))
        };
        let mut a = build();
        let mut b = build();
        a.trigger();
        b.trigger();
        a.update(0.1);
        b.update(0.1);
        assert_eq!(a.emitters[0].buffer().live(), b.emitters[0].buffer().live());
    }

    #[test]
    fn clear_empties_everything() {
        let mut effect = ParticleEffect::new("clear").with_emitter(single_emitter(10, 4));
        effect.set_auto_trigger(1.0).unwrap();
        effect.trigger();
        effect.update(0.5);
        effect.clear();
        assert_eq!(effect.active_particles(), 0);
        assert_eq!(effect.trigger_accumulator(), 0.0);
    }
}
