//! Ember Core - Foundational types for the Ember engine
//!
//! This crate provides the types shared by the engine crates:
//! - `Vec2` - 2D vector math
//! - `HslColor`, `Color` - particle (HSL) and render (RGBA) colors
//! - Error types and Result alias

mod error;
mod types;

pub use error::{EmberError, Result};
pub use types::{Color, HslColor, Vec2};
