//! In-memory `ResourceProvider`: named configurations plus registered sprites and sounds

use crate::backend::{ResourceProvider, SoundEffect, SoundHandle, Sprite, SpriteHandle};
use crate::config::{ParticleSystemConfig, SuffixRule};
use ember_core::{EmberError, Result};
use glam::Vec2;
use std::collections::HashMap;
use std::rc::Rc;

/// Resource cache keyed by name. Every lookup of the same name returns a clone of
/// the same `Rc`, so managers and the cache share one allocation.
#[derive(Debug)]
pub struct MemoryResources {
    systems: HashMap<String, ParticleSystemConfig>,
    sprites: HashMap<String, SpriteHandle>,
    sounds: HashMap<String, SoundHandle>,
    general_volume: f32,
    suffix_rules: Vec<SuffixRule>,
}

impl Default for MemoryResources {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResources {
    pub fn new() -> Self {
        Self {
            systems: HashMap::new(),
            sprites: HashMap::new(),
            sounds: HashMap::new(),
            general_volume: 1.0,
            suffix_rules: Vec::new(),
        }
    }

    pub fn insert_system(&mut self, name: impl Into<String>, config: ParticleSystemConfig) {
        self.systems.insert(name.into(), config);
    }

    /// Register a bitmap and return its shared handle
    pub fn insert_sprite(&mut self, name: impl Into<String>, size: Vec2) -> SpriteHandle {
        let name = name.into();
        let handle = Rc::new(Sprite {
            name: name.clone(),
            size,
        });
        self.sprites.insert(name, Rc::clone(&handle));
        handle
    }

    /// Register a sound and return its shared handle
    pub fn insert_sound(&mut self, name: impl Into<String>) -> SoundHandle {
        let name = name.into();
        let handle = Rc::new(SoundEffect { name: name.clone() });
        self.sounds.insert(name, Rc::clone(&handle));
        handle
    }

    pub fn set_general_volume(&mut self, volume: f32) {
        self.general_volume = volume;
    }

    pub fn add_suffix_rule(&mut self, rule: SuffixRule) {
        self.suffix_rules.push(rule);
    }

    /// Number of systems, sprites and sounds held
    pub fn len(&self) -> usize {
        self.systems.len() + self.sprites.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for MemoryResources {
    fn load_system(&mut self, name: &str) -> Result<ParticleSystemConfig> {
        self.systems
            .get(name)
            .cloned()
            .ok_or_else(|| EmberError::ResourceNotFound(format!("particle system '{name}'")))
    }

    fn sprite(&mut self, file: &str) -> Result<SpriteHandle> {
        self.sprites
            .get(file)
            .cloned()
            .ok_or_else(|| EmberError::AssetError(format!("bitmap '{file}' not loaded")))
    }

    fn sound(&mut self, file: &str) -> Result<SoundHandle> {
        self.sounds
            .get(file)
            .cloned()
            .ok_or_else(|| EmberError::AssetError(format!("sound '{file}' not loaded")))
    }

    fn general_volume(&self) -> f32 {
        self.general_volume
    }

    fn bitmap_suffix_rules(&self) -> &[SuffixRule] {
        &self.suffix_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_share_one_handle() {
        let mut res = MemoryResources::new();
        let original = res.insert_sprite("spark.png", Vec2::new(64.0, 32.0));
        let looked_up = res.sprite("spark.png").unwrap();
        assert!(Rc::ptr_eq(&original, &looked_up));
        assert_eq!(Rc::strong_count(&original), 3);
    }

    #[test]
    fn missing_resources_are_errors() {
        let mut res = MemoryResources::new();
        assert!(matches!(
            res.load_system("nope.toml"),
            Err(EmberError::ResourceNotFound(_))
        ));
        assert!(res.sprite("nope.png").is_err());
        assert!(res.sound("nope.ogg").is_err());
    }

    #[test]
    fn systems_are_returned_by_value() {
        let mut res = MemoryResources::new();
        res.insert_system(
            "fire",
            ParticleSystemConfig {
                particle_count: 9,
                ..Default::default()
            },
        );
        res.insert_sound("fire.ogg");
        assert_eq!(res.load_system("fire").unwrap().particle_count, 9);
        assert_eq!(res.len(), 2);
        assert!(!res.is_empty());
    }
}
