//! How an emitter runs its modifier list each frame

use crate::modifiers::Modifier;
use crate::particle::ParticleBuffer;
use serde::{Deserialize, Serialize};

/// Modifier execution strategy.
///
/// Both strategies apply modifiers in list order, so each modifier sees the
/// writes of the ones before it in the same frame. `Parallel` additionally
/// splits each modifier's scheduled window across the rayon thread pool;
/// it pays off only for large buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    #[default]
    Serial,
    Parallel,
}

impl ExecutionStrategy {
    pub fn execute(
        &self,
        modifiers: &mut [Modifier],
        elapsed_seconds: f32,
        buffer: &mut ParticleBuffer,
    ) {
        match self {
            ExecutionStrategy::Serial => {
                for modifier in modifiers.iter_mut() {
                    modifier.update(elapsed_seconds, buffer);
                }
            }
            ExecutionStrategy::Parallel => {
                for modifier in modifiers.iter_mut() {
                    modifier.update_parallel(elapsed_seconds, buffer);
                }
            }
        }
    }
}
