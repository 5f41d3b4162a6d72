//! Spawn profiles: where a new particle starts relative to its emitter, and
//! which way it heads.

use crate::rand::ParticleRng;
use ember_core::{EmberError, Vec2};
use std::str::FromStr;

/// Heading policy for [`Profile::Line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRadiation {
    /// Independent random heading
    None,
    /// The profile's configured `direction`
    Directional,
    /// Axis turned 90° toward screen-up
    PerpendicularUp,
    /// Axis turned 90° toward screen-down
    PerpendicularDown,
}

impl FromStr for LineRadiation {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "directional" => Ok(Self::Directional),
            "perpendicular_up" => Ok(Self::PerpendicularUp),
            "perpendicular_down" => Ok(Self::PerpendicularDown),
            _ => Err(EmberError::invalid_enum(
                s,
                &["none", "directional", "perpendicular_up", "perpendicular_down"],
            )),
        }
    }
}

/// Heading policy for [`Profile::Circle`] and [`Profile::Ring`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleRadiation {
    /// Independent random heading, drawn after the offset
    None,
    /// Toward the center
    In,
    /// Away from the center
    Out,
}

impl FromStr for CircleRadiation {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(EmberError::invalid_enum(s, &["none", "in", "out"])),
        }
    }
}

/// Spawn geometry. Offsets are relative to the emitter; headings are unit vectors.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Point,
    /// Random heading within `spread` radians centered on `direction`
    Spray { direction: Vec2, spread: f32 },
    /// Segment of `length` along `axis`, centered on the emitter
    Line {
        axis: Vec2,
        length: f32,
        radiate: LineRadiation,
        direction: Vec2,
    },
    /// Anywhere inside the disc
    Circle { radius: f32, radiate: CircleRadiation },
    /// On the circle's perimeter
    Ring { radius: f32, radiate: CircleRadiation },
    /// Perimeter; each side equally likely regardless of length
    Box { width: f32, height: f32 },
    /// Perimeter; uniform along its length
    BoxUniform { width: f32, height: f32 },
    /// Anywhere inside the rectangle
    BoxFill { width: f32, height: f32 },
}

impl Profile {
    pub fn spray(direction: Vec2, spread: f32) -> Self {
        Self::Spray { direction, spread }
    }

    pub fn line(axis: Vec2, length: f32, radiate: LineRadiation) -> Self {
        Self::Line {
            axis,
            length,
            radiate,
            direction: Vec2::UNIT_X,
        }
    }

    pub fn circle(radius: f32, radiate: CircleRadiation) -> Self {
        Self::Circle { radius, radiate }
    }

    pub fn ring(radius: f32, radiate: CircleRadiation) -> Self {
        Self::Ring { radius, radiate }
    }

    /// Sample a spawn `(offset, heading)` pair
    pub fn offset_and_heading(&self, rng: &mut ParticleRng) -> (Vec2, Vec2) {
        match *self {
            Profile::Point => (Vec2::ZERO, rng.unit_vector()),
            Profile::Spray { direction, spread } => {
                let center = direction.angle();
                let angle = rng.range(center - spread * 0.5, center + spread * 0.5);
                (Vec2::ZERO, Vec2::from_angle(angle))
            }
            Profile::Line {
                axis,
                length,
                radiate,
                direction,
            } => {
                let axis = axis.normalized();
                let offset = axis * rng.range(length * -0.5, length * 0.5);
                let heading = match radiate {
                    LineRadiation::None => Vec2::ZERO,
                    LineRadiation::Directional => direction.normalized(),
                    LineRadiation::PerpendicularUp => Vec2::new(axis.y, -axis.x),
                    LineRadiation::PerpendicularDown => Vec2::new(-axis.y, axis.x),
                };
                // a zero axis or direction has no heading to give
                if heading == Vec2::ZERO {
                    (offset, rng.unit_vector())
                } else {
                    (offset, heading)
                }
            }
            Profile::Circle { radius, radiate } => {
                let dist = rng.range(0.0, radius);
                radial(rng, dist, radiate)
            }
            Profile::Ring { radius, radiate } => radial(rng, radius, radiate),
            Profile::Box { width, height } => {
                let offset = match rng.below(4) {
                    // top
                    0 => Vec2::new(width * (rng.next_f32() - 0.5), height * -0.5),
                    // right
                    1 => Vec2::new(width * 0.5, height * (rng.next_f32() - 0.5)),
                    // bottom
                    2 => Vec2::new(width * (rng.next_f32() - 0.5), height * 0.5),
                    // left
                    _ => Vec2::new(width * -0.5, height * (rng.next_f32() - 0.5)),
                };
                (offset, rng.unit_vector())
            }
            Profile::BoxUniform { width, height } => {
                let offset = perimeter_point(width, height, rng.next_f32());
                (offset, rng.unit_vector())
            }
            Profile::BoxFill { width, height } => {
                let offset = Vec2::new(
                    rng.range(width * -0.5, width * 0.5),
                    rng.range(height * -0.5, height * 0.5),
                );
                (offset, rng.unit_vector())
            }
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::Point
    }
}

impl FromStr for Profile {
    type Err = EmberError;

    /// Parse a profile kind by name with unit dimensions; authoring tools
    /// fill in the geometry afterwards.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Profile::Point),
            "spray" => Ok(Profile::spray(Vec2::UNIT_Y, std::f32::consts::FRAC_PI_4)),
            "line" => Ok(Profile::line(Vec2::UNIT_X, 1.0, LineRadiation::None)),
            "circle" => Ok(Profile::circle(1.0, CircleRadiation::None)),
            "ring" => Ok(Profile::ring(1.0, CircleRadiation::None)),
            "box" => Ok(Profile::Box {
                width: 1.0,
                height: 1.0,
            }),
            "box_uniform" => Ok(Profile::BoxUniform {
                width: 1.0,
                height: 1.0,
            }),
            "box_fill" => Ok(Profile::BoxFill {
                width: 1.0,
                height: 1.0,
            }),
            _ => Err(EmberError::invalid_enum(
                s,
                &[
                    "point",
                    "spray",
                    "line",
                    "circle",
                    "ring",
                    "box",
                    "box_uniform",
                    "box_fill",
                ],
            )),
        }
    }
}

/// Shared by circle and ring: place at `dist` along a random direction.
/// `None` draws a second, unrelated heading so position and direction are
/// decorrelated.
fn radial(rng: &mut ParticleRng, dist: f32, radiate: CircleRadiation) -> (Vec2, Vec2) {
    let mut heading = rng.unit_vector();
    let offset = match radiate {
        CircleRadiation::In => -heading * dist,
        CircleRadiation::Out | CircleRadiation::None => heading * dist,
    };
    if radiate == CircleRadiation::None {
        heading = rng.unit_vector();
    }
    (offset, heading)
}

/// Map `t` in [0, 1] to a point walking clockwise around the rectangle
/// perimeter, starting at the top-left corner.
fn perimeter_point(width: f32, height: f32, t: f32) -> Vec2 {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let mut d = t * 2.0 * (width + height);

    if d < width {
        return Vec2::new(-half_w + d, -half_h);
    }
    d -= width;
    if d < height {
        return Vec2::new(half_w, -half_h + d);
    }
    d -= height;
    if d < width {
        return Vec2::new(half_w - d, half_h);
    }
    d -= width;
    Vec2::new(-half_w, (half_h - d).max(-half_h))
}
