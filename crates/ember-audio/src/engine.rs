//! Particle sound playback on Kira's AudioManager
//!
//! Sounds are cached by the same name the particle resources hand out, so a
//! `SoundEffect` maps straight onto a `StaticSoundData`. Degrades gracefully
//! when no audio device is available.

use ember_core::{EmberError, Result};
use ember_particles::{AudioBackend, SoundEffect};
use glam::Vec2;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::PlaybackState;
use kira::{AudioManager, DefaultBackend, Panning, Tween};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Smooth tween duration for parameter changes (avoids clicks)
const PARAM_TWEEN: Tween = Tween {
    duration: Duration::from_millis(16),
    easing: kira::Easing::Linear,
    start_time: kira::StartTime::Immediate,
};

/// Horizontal band of the screen mapped onto the stereo field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub center_x: f32,
    pub half_width: f32,
}

pub struct KiraAudio {
    manager: Option<AudioManager<DefaultBackend>>,
    sound_cache: HashMap<String, StaticSoundData>,
    /// Latest playback per sound name
    handles: HashMap<String, StaticSoundHandle>,
    master_volume: f32,
    stage: Option<Stage>,
}

impl Default for KiraAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl KiraAudio {
    pub fn new() -> Self {
        let manager = AudioManager::<DefaultBackend>::new(kira::AudioManagerSettings::default())
            .map_err(|e| log::warn!("audio: no device available ({e}), running silent"))
            .ok();

        Self {
            manager,
            sound_cache: HashMap::new(),
            handles: HashMap::new(),
            master_volume: 1.0,
            stage: None,
        }
    }

    /// Whether audio is actually available
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Load a sound file into the cache under `name`
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        if self.sound_cache.contains_key(name) {
            return Ok(());
        }

        let sound_data = StaticSoundData::from_file(path).map_err(|e| {
            EmberError::AudioError(format!("Failed to load '{}': {}", path.display(), e))
        })?;

        log::debug!("audio: loaded '{name}' from {}", path.display());
        self.sound_cache.insert(name.to_string(), sound_data);
        Ok(())
    }

    /// Check if a sound is already loaded
    pub fn has_sound(&self, name: &str) -> bool {
        self.sound_cache.contains_key(name)
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
    }

    /// Enable stereo panning from the emitter's screen x coordinate
    pub fn set_stage(&mut self, stage: Option<Stage>) {
        self.stage = stage;
    }

    /// Stop everything and forget the playback handles
    pub fn stop_all(&mut self) {
        for handle in self.handles.values_mut() {
            handle.stop(PARAM_TWEEN);
        }
        self.handles.clear();
    }

    /// Drop handles of sounds that finished on their own
    pub fn cleanup_finished(&mut self) {
        self.handles
            .retain(|_, handle| handle.state() != PlaybackState::Stopped);
    }

    fn try_play(&mut self, sound: &SoundEffect, looping: bool, volume: f32) -> Result<()> {
        let Some(manager) = &mut self.manager else {
            return Ok(());
        };

        let sound_data = self
            .sound_cache
            .get(&sound.name)
            .ok_or_else(|| EmberError::AudioError(format!("Sound not cached: {}", sound.name)))?
            .clone();

        let mut data = sound_data.volume(amplitude_to_db(volume * self.master_volume));
        if looping {
            data = data.loop_region(..);
        }

        let handle = manager.play(data).map_err(|e| {
            EmberError::AudioError(format!("Failed to play '{}': {e}", sound.name))
        })?;

        if let Some(mut previous) = self.handles.insert(sound.name.clone(), handle) {
            previous.stop(PARAM_TWEEN);
        }
        Ok(())
    }
}

impl AudioBackend for KiraAudio {
    fn play(&mut self, sound: &SoundEffect, looping: bool, volume: f32) {
        if let Err(e) = self.try_play(sound, looping, volume) {
            log::warn!("audio: {e}");
        }
    }

    fn stop(&mut self, sound: &SoundEffect) {
        if let Some(mut handle) = self.handles.remove(&sound.name) {
            handle.stop(PARAM_TWEEN);
        }
    }

    fn is_playing(&self, sound: &SoundEffect) -> bool {
        self.handles
            .get(&sound.name)
            .is_some_and(|handle| handle.state() != PlaybackState::Stopped)
    }

    fn set_volume(&mut self, sound: &SoundEffect, volume: f32) {
        if let Some(handle) = self.handles.get_mut(&sound.name) {
            handle.set_volume(amplitude_to_db(volume * self.master_volume), PARAM_TWEEN);
        }
    }

    fn set_position(&mut self, sound: &SoundEffect, position: Vec2) {
        let Some(stage) = self.stage else {
            return;
        };
        if let Some(handle) = self.handles.get_mut(&sound.name) {
            handle.set_panning(Panning(pan_for(stage, position.x)), PARAM_TWEEN);
        }
    }
}

/// Stereo pan in [-1, 1] for a screen x coordinate
pub fn pan_for(stage: Stage, x: f32) -> f32 {
    if stage.half_width <= 0.0 {
        return 0.0;
    }
    ((x - stage.center_x) / stage.half_width).clamp(-1.0, 1.0)
}

/// Convert linear amplitude (0.0 to 2.0) to decibels
pub(crate) fn amplitude_to_db(amplitude: f32) -> kira::Decibels {
    if amplitude <= 0.0 {
        kira::Decibels(-60.0) // silence
    } else {
        kira::Decibels((20.0 * amplitude.log10()).max(-60.0))
    }
}
