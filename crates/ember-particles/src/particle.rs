//! Particle record, fixed-capacity buffer and index cursor

use bytemuck::{Pod, Zeroable};
use ember_core::{HslColor, Vec2};

/// Simulation state of one particle. 68 bytes, no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Emitter time at which the particle was spawned
    pub inception: f32,
    /// Normalized age: 0 at birth, 1 at end of life
    pub age: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: Vec2,
    /// Emitter position at spawn time; local origin for containers and vortices
    pub triggered_position: Vec2,
    pub color: HslColor,
    pub opacity: f32,
    /// Radians
    pub rotation: f32,
    pub mass: f32,
    /// 0 = front, 1 = back
    pub layer_depth: f32,
}

impl Particle {
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// A NaN age counts as expired
    pub fn is_expired(&self) -> bool {
        self.age >= 1.0 || self.age.is_nan()
    }
}

/// Swap-remove arena. Live particles occupy `[0, total)`; the rest is free.
///
/// Storage is allocated once at construction and never grows.
pub struct ParticleBuffer {
    particles: Vec<Particle>,
    count: usize,
}

impl ParticleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity],
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Number of live particles
    pub fn total(&self) -> usize {
        self.count
    }

    pub fn available(&self) -> usize {
        self.particles.len() - self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.particles.len()
    }

    /// Append one particle to the live range, returning it for initialization.
    /// Returns None if the buffer is full.
    pub fn spawn(&mut self) -> Option<&mut Particle> {
        if self.is_full() {
            return None;
        }
        let idx = self.count;
        self.count += 1;
        let p = &mut self.particles[idx];
        *p = Particle::default();
        Some(p)
    }

    /// Cursor over the live range starting at `offset`
    pub fn iter_from(&mut self, offset: usize) -> ParticleIterator<'_> {
        ParticleIterator::new(&mut self.particles[..self.count], offset)
    }

    pub fn live(&self) -> &[Particle] {
        &self.particles[..self.count]
    }

    pub fn live_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.count]
    }

    /// Swap-and-pop every particle whose age reached 1. Returns how many were retired.
    pub fn retire_expired(&mut self) -> usize {
        let before = self.count;
        let mut i = 0;
        while i < self.count {
            if self.particles[i].is_expired() {
                self.count -= 1;
                if i < self.count {
                    self.particles.swap(i, self.count);
                }
                // The swapped-in particle still needs checking
            } else {
                i += 1;
            }
        }
        before - self.count
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }
}

/// Index cursor over a buffer's live range.
///
/// Traversal stops at the live count; it never wraps. The cursor can be moved
/// with [`reset`](Self::reset) so a modifier can resume mid-buffer.
pub struct ParticleIterator<'a> {
    particles: &'a mut [Particle],
    position: usize,
}

impl<'a> ParticleIterator<'a> {
    pub fn new(particles: &'a mut [Particle], offset: usize) -> Self {
        Self {
            particles,
            position: offset,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.particles.len()
    }

    pub fn next_mut(&mut self) -> Option<&mut Particle> {
        let p = self.particles.get_mut(self.position)?;
        self.position += 1;
        Some(p)
    }

    pub fn reset(&mut self, offset: usize) {
        self.position = offset;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Live particles visible to this cursor
    pub fn total(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(buffer: &mut ParticleBuffer, n: usize) {
        for i in 0..n {
            let p = buffer.spawn().unwrap();
            p.position.x = i as f32;
        }
    }

    #[test]
    fn particle_layout() {
        assert_eq!(std::mem::size_of::<Particle>(), 68);
        assert_eq!(std::mem::align_of::<Particle>(), 4);
    }

    #[test]
    fn spawn_refused_when_full() {
        let mut buffer = ParticleBuffer::new(4);
        assert!(buffer.is_empty());
        fill(&mut buffer, 4);
        assert!(buffer.is_full());
        assert_eq!(buffer.available(), 0);
        assert!(buffer.spawn().is_none());
        assert_eq!(buffer.total(), 4);
    }

    #[test]
    fn retire_swaps_last_into_hole() {
        let mut buffer = ParticleBuffer::new(4);
        fill(&mut buffer, 3);

        buffer.live_mut()[0].age = 1.0;
        assert_eq!(buffer.retire_expired(), 1);
        assert_eq!(buffer.total(), 2);
        // The last particle moved into slot 0
        assert_eq!(buffer.live()[0].position.x, 2.0);
        assert_eq!(buffer.live()[1].position.x, 1.0);
    }

    #[test]
    fn retire_handles_consecutive_expired() {
        let mut buffer = ParticleBuffer::new(5);
        fill(&mut buffer, 5);
        for p in buffer.live_mut() {
            if p.position.x >= 2.0 {
                p.age = 1.5;
            }
        }
        buffer.live_mut()[0].age = 1.0;
        assert_eq!(buffer.retire_expired(), 4);
        assert_eq!(buffer.total(), 1);
        assert_eq!(buffer.live()[0].position.x, 1.0);
    }

    #[test]
    fn iterator_empty_buffer() {
        let mut buffer = ParticleBuffer::new(8);
        let mut it = buffer.iter_from(0);
        assert!(!it.has_next());
        assert!(it.next_mut().is_none());
    }

    #[test]
    fn iterator_offset_past_end() {
        let mut buffer = ParticleBuffer::new(8);
        fill(&mut buffer, 3);
        let mut it = buffer.iter_from(3);
        assert!(!it.has_next());
        it.reset(7);
        assert!(it.next_mut().is_none());
    }

    #[test]
    fn iterator_stops_at_live_count_and_resets() {
        let mut buffer = ParticleBuffer::new(8);
        fill(&mut buffer, 3);
        let mut it = buffer.iter_from(1);
        assert_eq!(it.total(), 3);

        let mut seen = Vec::new();
        while let Some(p) = it.next_mut() {
            seen.push(p.position.x);
        }
        assert_eq!(seen, vec![1.0, 2.0]);

        it.reset(0);
        assert_eq!(it.position(), 0);
        assert_eq!(it.next_mut().map(|p| p.position.x), Some(0.0));
    }

    #[test]
    fn spawn_reinitializes_recycled_slot() {
        let mut buffer = ParticleBuffer::new(1);
        {
            let p = buffer.spawn().unwrap();
            p.opacity = 0.7;
            p.age = 1.0;
        }
        buffer.retire_expired();
        let p = buffer.spawn().unwrap();
        assert_eq!(p.opacity, 0.0);
        assert_eq!(p.age, 0.0);
    }
}
