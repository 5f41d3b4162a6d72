//! Start → end interpolation of a single particle property, driven by age or speed

use super::ParticleModifier;
use crate::particle::Particle;
use ember_core::{HslColor, Vec2};

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One property blended linearly from `start` (fraction 0) to `end` (fraction 1)
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolator {
    Color { start: HslColor, end: HslColor },
    /// Hue only; saturation and lightness are left alone
    Hue { start: f32, end: f32 },
    Opacity { start: f32, end: f32 },
    Rotation { start: f32, end: f32 },
    Scale { start: Vec2, end: Vec2 },
    Velocity { start: Vec2, end: Vec2 },
}

impl Interpolator {
    pub fn apply(&self, fraction: f32, particle: &mut Particle) {
        match self {
            Interpolator::Color { start, end } => particle.color = start.lerp(end, fraction),
            Interpolator::Hue { start, end } => {
                particle.color.h = lerp_f32(*start, *end, fraction);
            }
            Interpolator::Opacity { start, end } => {
                particle.opacity = lerp_f32(*start, *end, fraction);
            }
            Interpolator::Rotation { start, end } => {
                particle.rotation = lerp_f32(*start, *end, fraction);
            }
            Interpolator::Scale { start, end } => particle.scale = start.lerp(end, fraction),
            Interpolator::Velocity { start, end } => particle.velocity = start.lerp(end, fraction),
        }
    }
}

/// Runs its interpolators with the particle's normalized age as the fraction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgeModifier {
    pub interpolators: Vec<Interpolator>,
}

impl ParticleModifier for AgeModifier {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let fraction = particle.age;
        for interpolator in &self.interpolators {
            interpolator.apply(fraction, particle);
        }
    }
}

/// Runs its interpolators with `min(1, speed / velocity_threshold)` as the fraction
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityModifier {
    pub interpolators: Vec<Interpolator>,
    pub velocity_threshold: f32,
}

impl ParticleModifier for VelocityModifier {
    fn apply(&self, _elapsed_seconds: f32, particle: &mut Particle) {
        let fraction = if self.velocity_threshold > 0.0 {
            (particle.speed() / self.velocity_threshold).min(1.0)
        } else {
            1.0
        };
        for interpolator in &self.interpolators {
            interpolator.apply(fraction, particle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_f32_endpoints() {
        assert!((lerp_f32(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn age_modifier_uses_normalized_age() {
        let modifier = AgeModifier {
            interpolators: vec![
                Interpolator::Opacity {
                    start: 1.0,
                    end: 0.0,
                },
                Interpolator::Scale {
                    start: Vec2::new(1.0, 1.0),
                    end: Vec2::new(3.0, 5.0),
                },
                Interpolator::Rotation {
                    start: 0.0,
                    end: 4.0,
                },
            ],
        };
        let mut p = Particle {
            age: 0.5,
            ..Default::default()
        };
        modifier.apply(0.016, &mut p);
        assert!((p.opacity - 0.5).abs() < 1e-6);
        assert_eq!(p.scale, Vec2::new(2.0, 3.0));
        assert!((p.rotation - 2.0).abs() < 1e-6);
    }

    #[test]
    fn hue_interpolator_keeps_saturation_and_lightness() {
        let mut p = Particle {
            color: HslColor::new(0.0, 0.3, 0.7),
            ..Default::default()
        };
        Interpolator::Hue {
            start: 0.0,
            end: 360.0,
        }
        .apply(0.25, &mut p);
        assert_eq!(p.color, HslColor::new(90.0, 0.3, 0.7));
    }

    #[test]
    fn color_interpolator_blends_all_channels() {
        let mut p = Particle::default();
        Interpolator::Color {
            start: HslColor::new(0.0, 0.0, 0.0),
            end: HslColor::new(100.0, 1.0, 0.5),
        }
        .apply(0.5, &mut p);
        assert_eq!(p.color, HslColor::new(50.0, 0.5, 0.25));
    }

    #[test]
    fn velocity_modifier_fraction_saturates() {
        let modifier = VelocityModifier {
            interpolators: vec![Interpolator::Opacity {
                start: 0.0,
                end: 1.0,
            }],
            velocity_threshold: 10.0,
        };

        let mut slow = Particle {
            velocity: Vec2::new(0.0, 2.5),
            ..Default::default()
        };
        modifier.apply(0.016, &mut slow);
        assert!((slow.opacity - 0.25).abs() < 1e-6);

        let mut fast = Particle {
            velocity: Vec2::new(30.0, 40.0),
            ..Default::default()
        };
        modifier.apply(0.016, &mut fast);
        assert_eq!(fast.opacity, 1.0);
    }

    #[test]
    fn velocity_interpolator_overwrites_velocity() {
        let modifier = VelocityModifier {
            interpolators: vec![Interpolator::Velocity {
                start: Vec2::ZERO,
                end: Vec2::new(0.0, -8.0),
            }],
            velocity_threshold: 0.0,
        };
        let mut p = Particle {
            velocity: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        modifier.apply(0.016, &mut p);
        assert_eq!(p.velocity, Vec2::new(0.0, -8.0));
    }
}
