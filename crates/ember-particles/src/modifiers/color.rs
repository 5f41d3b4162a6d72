//! Opacity and color modifiers

use super::ParticleModifier;
use crate::particle::Particle;
use ember_core::HslColor;

/// `opacity = 1 - age`. Fades linearly over the particle's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OpacityFastFade;

impl ParticleModifier for OpacityFastFade {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        particle.opacity = 1.0 - particle.age;
    }
}

/// Blends from `stationary_color` toward `velocity_color` as speed approaches
/// `velocity_threshold`; at or above the threshold the color snaps.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityColor {
    pub stationary_color: HslColor,
    pub velocity_color: HslColor,
    pub velocity_threshold: f32,
}

impl ParticleModifier for VelocityColor {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let speed_sq = particle.velocity.length_squared();
        if speed_sq >= self.velocity_threshold * self.velocity_threshold {
            particle.color = self.velocity_color;
        } else {
            let t = speed_sq.sqrt() / self.velocity_threshold;
            particle.color = self.stationary_color.lerp(&self.velocity_color, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Vec2;

    #[test]
    fn fast_fade_tracks_age() {
        let mut p = Particle {
            age: 0.25,
            opacity: 1.0,
            ..Default::default()
        };
        OpacityFastFade.apply(0.016, &mut p);
        assert_eq!(p.opacity, 0.75);
    }

    #[test]
    fn velocity_color_blends_and_snaps() {
        let modifier = VelocityColor {
            stationary_color: HslColor::new(0.0, 0.0, 0.0),
            velocity_color: HslColor::new(200.0, 1.0, 1.0),
            velocity_threshold: 10.0,
        };

        let mut slow = Particle {
            velocity: Vec2::new(3.0, 4.0),
            ..Default::default()
        };
        modifier.apply(0.016, &mut slow);
        assert!((slow.color.h - 100.0).abs() < 1e-4);
        assert!((slow.color.l - 0.5).abs() < 1e-6);

        let mut fast = Particle {
            velocity: Vec2::new(0.0, 12.0),
            ..Default::default()
        };
        modifier.apply(0.016, &mut fast);
        assert_eq!(fast.color, modifier.velocity_color);
    }

    #[test]
    fn zero_threshold_always_snaps() {
        let modifier = VelocityColor {
            stationary_color: HslColor::BLACK,
            velocity_color: HslColor::WHITE,
            velocity_threshold: 0.0,
        };
        let mut p = Particle::default();
        modifier.apply(0.016, &mut p);
        assert_eq!(p.color, HslColor::WHITE);
    }
}
