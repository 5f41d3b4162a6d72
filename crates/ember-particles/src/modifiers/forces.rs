//! Velocity and rotation modifiers: gravity, drag, spin, vortex

use super::ParticleModifier;
use crate::particle::Particle;
use ember_core::{EmberError, Result, Vec2};

/// Constant pull along `direction`. Force scales with particle mass.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGravity {
    pub direction: Vec2,
    pub strength: f32,
}

impl ParticleModifier for LinearGravity {
    fn apply(&self, elapsed_seconds: f32, particle: &mut Particle) {
        particle.velocity += self.direction * self.strength * elapsed_seconds * particle.mass;
    }
}

/// Velocity damping proportional to the current velocity
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub drag_coefficient: f32,
    pub density: f32,
}

impl ParticleModifier for Drag {
    fn apply(&self, elapsed_seconds: f32, particle: &mut Particle) {
        let drag = -self.drag_coefficient * self.density * particle.mass * elapsed_seconds;
        particle.velocity += particle.velocity * drag;
    }
}

/// Constant angular speed, radians per second
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    pub rotation_rate: f32,
}

impl ParticleModifier for Rotation {
    fn apply(&self, elapsed_seconds: f32, particle: &mut Particle) {
        particle.rotation += self.rotation_rate * elapsed_seconds;
    }
}

/// Spiral force field around `position` (relative to each particle's
/// triggered position). Only particles between the inner and outer radius
/// are affected; the pull grows as particles get closer.
#[derive(Debug, Clone, PartialEq)]
pub struct Vortex {
    pub position: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub strength: f32,
    pub max_velocity: f32,
    rotation_angle: f32,
    cos: f32,
    sin: f32,
}

impl Vortex {
    pub fn new(
        position: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        strength: f32,
        max_velocity: f32,
        rotation_angle: f32,
    ) -> Result<Self> {
        if inner_radius < 0.0 || inner_radius > outer_radius {
            return Err(EmberError::InvalidArgument(format!(
                "vortex radii must satisfy 0 <= inner <= outer, got inner={inner_radius} outer={outer_radius}"
            )));
        }
        if max_velocity < 0.0 {
            return Err(EmberError::InvalidArgument(format!(
                "vortex max_velocity must be non-negative, got {max_velocity}"
            )));
        }
        let (sin, cos) = rotation_angle.sin_cos();
        Ok(Self {
            position,
            inner_radius,
            outer_radius,
            strength,
            max_velocity,
            rotation_angle,
            cos,
            sin,
        })
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Also refreshes the cached cosine/sine used per particle
    pub fn set_rotation_angle(&mut self, angle: f32) {
        self.rotation_angle = angle;
        (self.sin, self.cos) = angle.sin_cos();
    }
}

impl ParticleModifier for Vortex {
    fn apply(&self, elapsed_seconds: f32, particle: &mut Particle) {
        let center = self.position + particle.triggered_position;
        let diff = center - particle.position;
        let distance = diff.length();
        if distance <= 0.0 || distance < self.inner_radius || distance > self.outer_radius {
            return;
        }

        let pull = (diff / distance).rotated_by(self.cos, self.sin);
        let force = self.strength * (self.outer_radius / distance);
        particle.velocity += pull * (force * elapsed_seconds);

        let speed = particle.velocity.length();
        if speed > self.max_velocity {
            particle.velocity *= self.max_velocity / speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn particle_at(position: Vec2) -> Particle {
        Particle {
            position,
            mass: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn gravity_scales_with_mass() {
        let gravity = LinearGravity {
            direction: Vec2::new(0.0, -1.0),
            strength: 98.0,
        };
        let mut p = particle_at(Vec2::ZERO);
        p.mass = 2.0;
        gravity.apply(0.1, &mut p);
        assert_eq!(p.velocity, Vec2::new(0.0, -19.6));
    }

    #[test]
    fn drag_decays_velocity() {
        let drag = Drag {
            drag_coefficient: 0.5,
            density: 2.0,
        };
        let mut p = particle_at(Vec2::ZERO);
        p.velocity = Vec2::new(10.0, -4.0);
        drag.apply(0.1, &mut p);
        // factor = 1 - 0.5 * 2 * 1 * 0.1 = 0.9
        assert!((p.velocity.x - 9.0).abs() < 1e-5);
        assert!((p.velocity.y + 3.6).abs() < 1e-5);
    }

    #[test]
    fn rotation_accumulates() {
        let spin = Rotation { rotation_rate: 2.0 };
        let mut p = particle_at(Vec2::ZERO);
        spin.apply(0.25, &mut p);
        spin.apply(0.25, &mut p);
        assert!((p.rotation - 1.0).abs() < 1e-6);
    }

    #[test]
    fn vortex_rejects_inverted_radii() {
        assert!(Vortex::new(Vec2::ZERO, 10.0, 5.0, 1.0, 100.0, 0.0).is_err());
        assert!(Vortex::new(Vec2::ZERO, 0.0, 5.0, 1.0, -1.0, 0.0).is_err());
    }

    #[test]
    fn vortex_pulls_toward_center_without_rotation() {
        let vortex = Vortex::new(Vec2::ZERO, 0.0, 100.0, 10.0, 1000.0, 0.0).unwrap();
        let mut p = particle_at(Vec2::new(50.0, 0.0));
        vortex.apply(0.1, &mut p);
        // force = 10 * (100 / 50) = 20, times 0.1s
        assert!((p.velocity.x + 2.0).abs() < 1e-5);
        assert!(p.velocity.y.abs() < 1e-5);
    }

    #[test]
    fn vortex_rotation_turns_pull_tangential() {
        let vortex = Vortex::new(Vec2::ZERO, 0.0, 100.0, 10.0, 1000.0, FRAC_PI_2).unwrap();
        let mut p = particle_at(Vec2::new(50.0, 0.0));
        vortex.apply(0.1, &mut p);
        assert!(p.velocity.x.abs() < 1e-4);
        assert!((p.velocity.y + 2.0).abs() < 1e-4);
    }

    #[test]
    fn vortex_setter_refreshes_cache() {
        let mut vortex = Vortex::new(Vec2::ZERO, 0.0, 100.0, 10.0, 1000.0, 0.0).unwrap();
        vortex.set_rotation_angle(FRAC_PI_2);
        assert_eq!(vortex.rotation_angle(), FRAC_PI_2);
        let mut p = particle_at(Vec2::new(50.0, 0.0));
        vortex.apply(0.1, &mut p);
        assert!(p.velocity.x.abs() < 1e-4);
    }

    #[test]
    fn vortex_ignores_particles_outside_band_and_at_center() {
        let vortex = Vortex::new(Vec2::ZERO, 10.0, 20.0, 10.0, 1000.0, 0.0).unwrap();
        for x in [0.0, 5.0, 25.0] {
            let mut p = particle_at(Vec2::new(x, 0.0));
            vortex.apply(0.1, &mut p);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn vortex_is_anchored_at_triggered_position() {
        let vortex = Vortex::new(Vec2::ZERO, 0.0, 10.0, 10.0, 1000.0, 0.0).unwrap();
        let mut p = particle_at(Vec2::new(105.0, 0.0));
        p.triggered_position = Vec2::new(100.0, 0.0);
        vortex.apply(0.1, &mut p);
        assert!(p.velocity.x < 0.0);
    }

    #[test]
    fn vortex_clamps_speed() {
        let vortex = Vortex::new(Vec2::ZERO, 0.0, 100.0, 1000.0, 3.0, 0.0).unwrap();
        let mut p = particle_at(Vec2::new(10.0, 0.0));
        vortex.apply(1.0, &mut p);
        assert!((p.velocity.length() - 3.0).abs() < 1e-4);
    }
}
