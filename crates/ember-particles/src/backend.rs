//! Services the particle manager consumes: resources and audio playback
//!
//! Sprites and sounds are shared through `Rc` handles. A handle stays valid for
//! as long as either the manager or the resource cache holds it.

use crate::config::{ParticleSystemConfig, SuffixRule};
use ember_core::Result;
use glam::Vec2;
use std::rc::Rc;

/// A loaded sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    /// Size of the whole bitmap in pixels
    pub size: Vec2,
}

/// A loaded sound sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundEffect {
    pub name: String,
}

pub type SpriteHandle = Rc<Sprite>;
pub type SoundHandle = Rc<SoundEffect>;

/// Loads configurations and hands out shared sprite/sound handles
pub trait ResourceProvider {
    /// Load a particle system configuration by resource name
    fn load_system(&mut self, name: &str) -> Result<ParticleSystemConfig>;

    /// Get (or create and cache) the sprite for a bitmap file
    fn sprite(&mut self, file: &str) -> Result<SpriteHandle>;

    /// Get (or create and cache) the sound for a sound file
    fn sound(&mut self, file: &str) -> Result<SoundHandle>;

    /// Category volume applied to every particle sound effect
    fn general_volume(&self) -> f32 {
        1.0
    }

    /// Bitmap file substitutions (platform or resolution variants)
    fn bitmap_suffix_rules(&self) -> &[SuffixRule] {
        &[]
    }
}

/// Sound playback service
pub trait AudioBackend {
    fn play(&mut self, sound: &SoundEffect, looping: bool, volume: f32);

    fn stop(&mut self, sound: &SoundEffect);

    fn is_playing(&self, sound: &SoundEffect) -> bool;

    /// Change the volume of a sound that is already playing
    fn set_volume(&mut self, _sound: &SoundEffect, _volume: f32) {}

    /// Follow the emitting entity (panning / spatialization), if supported
    fn set_position(&mut self, _sound: &SoundEffect, _position: Vec2) {}
}

/// Audio backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, _sound: &SoundEffect, _looping: bool, _volume: f32) {}

    fn stop(&mut self, _sound: &SoundEffect) {}

    fn is_playing(&self, _sound: &SoundEffect) -> bool {
        false
    }
}
