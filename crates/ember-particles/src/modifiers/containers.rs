//! Container modifiers. Each particle gets its own container centered on the
//! position it was triggered at.

use super::ParticleModifier;
use crate::particle::Particle;

/// Axis-aligned box; particles bounce off the edges
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleContainer {
    pub width: f32,
    pub height: f32,
    pub restitution_coefficient: f32,
}

impl ParticleModifier for RectangleContainer {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let origin = particle.triggered_position;
        let left = origin.x - self.width * 0.5;
        let right = origin.x + self.width * 0.5;
        let top = origin.y - self.height * 0.5;
        let bottom = origin.y + self.height * 0.5;

        let pos = &mut particle.position;
        let vel = &mut particle.velocity;

        if pos.x < left {
            pos.x = left + (left - pos.x);
            vel.x = -vel.x * self.restitution_coefficient;
        } else if pos.x > right {
            pos.x = right - (pos.x - right);
            vel.x = -vel.x * self.restitution_coefficient;
        }

        if pos.y < top {
            pos.y = top + (top - pos.y);
            vel.y = -vel.y * self.restitution_coefficient;
        } else if pos.y > bottom {
            pos.y = bottom - (pos.y - bottom);
            vel.y = -vel.y * self.restitution_coefficient;
        }
    }
}

/// Axis-aligned box with toroidal wrap; velocity is untouched
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleLoopContainer {
    pub width: f32,
    pub height: f32,
}

impl ParticleModifier for RectangleLoopContainer {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let origin = particle.triggered_position;
        let left = origin.x - self.width * 0.5;
        let right = origin.x + self.width * 0.5;
        let top = origin.y - self.height * 0.5;
        let bottom = origin.y + self.height * 0.5;

        let pos = &mut particle.position;
        if pos.x < left {
            pos.x += self.width;
        } else if pos.x > right {
            pos.x -= self.width;
        }
        if pos.y < top {
            pos.y += self.height;
        } else if pos.y > bottom {
            pos.y -= self.height;
        }
    }
}

/// Circle that keeps particles inside (`inside = true`) or outside it
#[derive(Debug, Clone, PartialEq)]
pub struct CircleContainer {
    pub radius: f32,
    pub inside: bool,
    pub restitution_coefficient: f32,
}

impl ParticleModifier for CircleContainer {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let local = particle.position - particle.triggered_position;
        let dist_sq = local.length_squared();
        let radius_sq = self.radius * self.radius;

        if self.inside {
            if dist_sq <= radius_sq {
                return;
            }
        } else if dist_sq >= radius_sq {
            return;
        }

        let dist = dist_sq.sqrt();
        // no normal at the exact center
        if dist <= 0.0 {
            return;
        }
        let normal = local / dist;
        let penetration = dist - self.radius;

        let along = particle.velocity.dot(&normal);
        particle.velocity -= normal * (2.0 * self.restitution_coefficient * along);
        particle.position -= normal * penetration;
    }
}
