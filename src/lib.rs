//! A small 2D particle effects engine.
//!
//! A [`ParticleSystem`] owns the live particles and a registry of named
//! [`Effect`] plugins. Each frame it clears its [`Surface`], asks every
//! particle's owning effect to advance and draw it, and drops the ones whose
//! update returned `None`.

pub mod color;
pub mod config;
pub mod easing;
pub mod effect;
pub mod effects;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod particle;
pub mod random;
pub mod renderer;
pub mod stats;
pub mod surface;
pub mod system;
pub mod timing;

pub use config::{Background, ConfigPatch, EngineConfig};
pub use effect::{Effect, EffectConfig, EffectOptions};
pub use error::EngineError;
pub use particle::{Particle, ParticleId};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use system::{FrameHandle, ParticleSystem};
