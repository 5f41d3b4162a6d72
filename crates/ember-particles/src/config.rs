//! Engine-wide particle settings
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! seed = 1234
//! force_serial = true
//! max_emitter_capacity = 4096
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use ember_core::{EmberError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Seed of the system generator that every effect forks from
    pub seed: u32,
    /// Run every emitter serially regardless of its configured strategy
    pub force_serial: bool,
    /// Largest buffer an emitter may allocate
    pub max_emitter_capacity: usize,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            seed: 0xDEAD_BEEF,
            force_serial: false,
            max_emitter_capacity: 10_000,
        }
    }
}

impl ParticleSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: ParticleSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content).map_err(|e| match e {
            EmberError::TomlParseError(msg) => {
                EmberError::TomlParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        log::info!("loaded particle settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_emitter_capacity == 0 {
            return Err(EmberError::ValueOutOfRange {
                field: "max_emitter_capacity".to_string(),
                min: 1.0,
                max: usize::MAX as f64,
                value: 0.0,
            });
        }
        Ok(())
    }
}
