//! Ember Particles - 2D sprite particle manager
//!
//! One `ParticleManager` per emitting entity:
//! - Fixed slot pool with staggered launch and in-place recycling
//! - Stable back-to-front depth ordering for alpha-correct drawing
//! - Sound cadence that promotes a one-shot effect to a loop under sustained emission
//! - Renderer-agnostic submission, with a GPU instance packer included

pub mod backend;
pub mod config;
pub mod curves;
pub mod instance;
pub mod manager;
pub mod particle;
pub mod rand;
pub mod render;
pub mod resources;
pub mod sort;
pub mod sound;

pub use backend::{
    AudioBackend, NullAudio, ResourceProvider, SoundEffect, SoundHandle, Sprite, SpriteHandle,
};
pub use config::{AlphaMode, AnimationMode, ParticleSystemConfig, SuffixRule, MAX_PARTICLES};
pub use instance::{InstanceBatch, SpriteInstance};
pub use manager::ParticleManager;
pub use particle::{Particle, ParticlePool};
pub use render::{DepthSortMode, DrawParams, FrameRect, SpriteDraw, SpriteRenderer};
pub use resources::MemoryResources;
pub use sort::DepthSorter;
pub use sound::{CadenceInput, SoundCadence, MIN_REPEATS_TO_LOOP_SOUND};
