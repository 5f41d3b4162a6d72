//! Packs live particles into renderer-ready instance data

use crate::effect::ParticleEffect;
use crate::emitter::ParticleBlendMode;
use crate::particle::Particle;
use crate::EffectHandle;
use bytemuck::{Pod, Zeroable};

/// GPU-ready per-particle instance data (40 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xy = world position, z = rotation (radians), w = layer depth
    pub position_rotation: [f32; 4],
    /// xyz = HSL color (hue in degrees), w = opacity
    pub color: [f32; 4],
    pub scale: [f32; 2],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            position_rotation: [p.position.x, p.position.y, p.rotation, p.layer_depth],
            color: [p.color.h, p.color.s, p.color.l, p.opacity],
            scale: p.scale.to_array(),
        }
    }
}

/// Draw data for one emitter, consumed by the renderer
pub struct ParticleDrawData<'a> {
    pub handle: EffectHandle,
    /// Index of the emitter within its effect
    pub emitter: usize,
    pub emitter_name: &'a str,
    pub blend_mode: ParticleBlendMode,
    pub texture: &'a str,
    pub instances: &'a [ParticleInstance],
}

struct InstanceRange {
    handle: EffectHandle,
    emitter: usize,
    emitter_name: String,
    blend_mode: ParticleBlendMode,
    texture: String,
    start: usize,
    count: usize,
}

/// Reusable instance buffer shared by every emitter in a system
#[derive(Default)]
pub struct ParticleBatch {
    instances: Vec<ParticleInstance>,
    ranges: Vec<InstanceRange>,
}

impl ParticleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repack from scratch. Emitters with no live particles get no range.
    pub fn pack<'a>(
        &mut self,
        effects: impl IntoIterator<Item = (EffectHandle, &'a ParticleEffect)>,
    ) {
        self.instances.clear();
        self.ranges.clear();

        for (handle, effect) in effects {
            for (index, emitter) in effect.emitters.iter().enumerate() {
                let live = emitter.buffer().live();
                if live.is_empty() {
                    continue;
                }
                let start = self.instances.len();
                self.instances.extend(live.iter().map(ParticleInstance::from_particle));
                self.ranges.push(InstanceRange {
                    handle,
                    emitter: index,
                    emitter_name: emitter.name.clone(),
                    blend_mode: emitter.blend_mode,
                    texture: emitter.texture.clone(),
                    start,
                    count: live.len(),
                });
            }
        }
    }

    /// Every packed instance, in draw order
    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn draw_data(&self) -> Vec<ParticleDrawData<'_>> {
        self.ranges
            .iter()
            .map(|range| ParticleDrawData {
                handle: range.handle,
                emitter: range.emitter,
                emitter_name: &range.emitter_name,
                blend_mode: range.blend_mode,
                texture: &range.texture,
                instances: &self.instances[range.start..range.start + range.count],
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.ranges.clear();
    }
}
