//! Sound effect cadence: when the particle sound starts, loops and stops
//!
//! A sound begins as a one-shot, re-triggered whenever a slot launches while the
//! previous shot has ended. Once every slot has completed `loop_threshold`
//! lifecycles the emission is considered sustained and the sound switches to
//! continuous looping until the system is killed.

use crate::backend::{AudioBackend, SoundHandle};
use glam::Vec2;

/// Minimum lifecycles every slot must complete before the sound loops
pub const MIN_REPEATS_TO_LOOP_SOUND: u32 = 4;

/// Aggregate particle state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CadenceInput {
    pub position: Vec2,
    /// Smallest repeat count across all slots
    pub min_repeat: u32,
    /// Slots launched or relaunched this frame
    pub launched: usize,
    pub killed: bool,
    pub finished: bool,
}

#[derive(Debug)]
pub struct SoundCadence {
    sound: Option<SoundHandle>,
    looping: bool,
    /// A looping playback was started and has not been stopped yet
    loop_playing: bool,
    stopped: bool,
    entity_volume: f32,
    general_volume: f32,
    last_volume: f32,
    loop_threshold: u32,
}

impl SoundCadence {
    pub fn new(entity_volume: f32, general_volume: f32) -> Self {
        Self {
            sound: None,
            looping: false,
            loop_playing: false,
            stopped: false,
            entity_volume,
            general_volume,
            last_volume: 0.0,
            loop_threshold: MIN_REPEATS_TO_LOOP_SOUND,
        }
    }

    /// Replace the sound; the new one starts out as a one-shot
    pub fn set_sound(&mut self, sound: Option<SoundHandle>) {
        self.sound = sound;
        self.looping = false;
        self.loop_playing = false;
    }

    pub fn sound(&self) -> Option<&SoundHandle> {
        self.sound.as_ref()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Force playback off (true) or allow it again (false)
    pub fn stop_sfx(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_entity_volume(&mut self, volume: f32) {
        self.entity_volume = volume;
    }

    pub fn entity_volume(&self) -> f32 {
        self.entity_volume
    }

    pub fn set_general_volume(&mut self, volume: f32) {
        self.general_volume = volume;
    }

    pub fn general_volume(&self) -> f32 {
        self.general_volume
    }

    /// Effective playback volume
    pub fn volume(&self) -> f32 {
        (self.entity_volume * self.general_volume).max(0.0)
    }

    pub fn set_loop_threshold(&mut self, repeats: u32) {
        self.loop_threshold = repeats;
    }

    pub fn loop_threshold(&self) -> u32 {
        self.loop_threshold
    }

    /// The owning system was killed: looping ends, the running loop is
    /// stopped on the next `handle` call.
    pub fn on_kill(&mut self) {
        self.looping = false;
    }

    pub fn handle(&mut self, audio: &mut dyn AudioBackend, input: &CadenceInput) {
        let Some(sound) = self.sound.clone() else {
            return;
        };

        let volume = self.volume();
        if self.stopped || volume <= 0.0 {
            if audio.is_playing(&sound) {
                audio.stop(&sound);
            }
            self.loop_playing = false;
            return;
        }

        // A finite system reaches its last repeat on the frame it finishes
        if !input.killed && !self.looping && input.min_repeat >= self.loop_threshold {
            self.looping = true;
            log::debug!(
                "sound '{}' promoted to loop after {} repeats",
                sound.name,
                input.min_repeat
            );
        }

        if input.killed || input.finished {
            if self.loop_playing {
                audio.stop(&sound);
                self.loop_playing = false;
                log::debug!("sound '{}' loop stopped", sound.name);
            }
            return;
        }

        audio.set_position(&sound, input.position);

        let playing = audio.is_playing(&sound);
        if self.looping {
            if !self.loop_playing || !playing {
                if playing {
                    audio.stop(&sound);
                }
                audio.play(&sound, true, volume);
                self.loop_playing = true;
                self.last_volume = volume;
                return;
            }
        } else if input.launched > 0 && !playing {
            audio.play(&sound, false, volume);
            self.last_volume = volume;
            return;
        }

        if playing && volume != self.last_volume {
            audio.set_volume(&sound, volume);
            self.last_volume = volume;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::SoundEffect;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum AudioCall {
        Play { looping: bool, volume: f32 },
        Stop,
        SetVolume(f32),
    }

    /// Records calls; a one-shot keeps "playing" until `finish_all` is called
    #[derive(Default)]
    pub(crate) struct RecordingAudio {
        pub calls: Vec<AudioCall>,
        pub playing: HashMap<String, bool>,
    }

    impl RecordingAudio {
        pub fn finish_all(&mut self) {
            self.playing.clear();
        }
    }

    impl AudioBackend for RecordingAudio {
        fn play(&mut self, sound: &SoundEffect, looping: bool, volume: f32) {
            self.calls.push(AudioCall::Play { looping, volume });
            self.playing.insert(sound.name.clone(), looping);
        }

        fn stop(&mut self, sound: &SoundEffect) {
            self.calls.push(AudioCall::Stop);
            self.playing.remove(&sound.name);
        }

        fn is_playing(&self, sound: &SoundEffect) -> bool {
            self.playing.contains_key(&sound.name)
        }

        fn set_volume(&mut self, _sound: &SoundEffect, volume: f32) {
            self.calls.push(AudioCall::SetVolume(volume));
        }
    }

    fn cadence() -> SoundCadence {
        let mut c = SoundCadence::new(0.5, 0.8);
        c.set_sound(Some(Rc::new(SoundEffect {
            name: "crackle.ogg".into(),
        })));
        c
    }

    fn frame(min_repeat: u32, launched: usize) -> CadenceInput {
        CadenceInput {
            min_repeat,
            launched,
            ..Default::default()
        }
    }

    #[test]
    fn volume_is_product_of_entity_and_general() {
        let c = cadence();
        assert!((c.volume() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn no_sound_is_a_noop() {
        let mut c = SoundCadence::new(1.0, 1.0);
        let mut audio = RecordingAudio::default();
        c.handle(&mut audio, &frame(10, 1));
        assert!(audio.calls.is_empty());
        assert!(!c.is_looping());
    }

    #[test]
    fn one_shot_retriggers_on_launch_when_idle() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();

        c.handle(&mut audio, &frame(0, 1));
        assert_eq!(audio.calls, vec![AudioCall::Play { looping: false, volume: 0.4 }]);

        // Still playing: no retrigger
        c.handle(&mut audio, &frame(0, 1));
        assert_eq!(audio.calls.len(), 1);

        // Nothing launched: no retrigger either
        audio.finish_all();
        c.handle(&mut audio, &frame(1, 0));
        assert_eq!(audio.calls.len(), 1);

        c.handle(&mut audio, &frame(1, 2));
        assert_eq!(audio.calls.len(), 2);
        assert!(!c.is_looping());
    }

    #[test]
    fn promotes_to_loop_at_threshold() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();

        c.handle(&mut audio, &frame(3, 1));
        assert!(!c.is_looping());

        c.handle(&mut audio, &frame(MIN_REPEATS_TO_LOOP_SOUND, 0));
        assert!(c.is_looping());
        // The running one-shot is restarted as a loop
        assert_eq!(
            &audio.calls[1..],
            &[AudioCall::Stop, AudioCall::Play { looping: true, volume: 0.4 }]
        );

        c.handle(&mut audio, &frame(MIN_REPEATS_TO_LOOP_SOUND + 1, 1));
        assert_eq!(audio.calls.len(), 3);
        assert!(c.is_looping());
    }

    #[test]
    fn threshold_is_tunable() {
        let mut c = cadence();
        c.set_loop_threshold(1);
        let mut audio = RecordingAudio::default();
        c.handle(&mut audio, &frame(1, 0));
        assert!(c.is_looping());
    }

    #[test]
    fn kill_stops_loop_and_clears_flag() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();
        c.handle(&mut audio, &frame(4, 0));
        assert!(c.is_looping());

        c.on_kill();
        assert!(!c.is_looping());
        c.handle(
            &mut audio,
            &CadenceInput {
                killed: true,
                ..frame(4, 0)
            },
        );
        assert_eq!(audio.calls.last(), Some(&AudioCall::Stop));
        assert!(audio.playing.is_empty());
    }

    #[test]
    fn promotes_on_the_finishing_frame_without_playing() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();
        c.handle(
            &mut audio,
            &CadenceInput {
                finished: true,
                ..frame(MIN_REPEATS_TO_LOOP_SOUND, 0)
            },
        );
        assert!(c.is_looping());
        assert!(audio.calls.is_empty());
    }

    #[test]
    fn killed_system_is_never_promoted() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();
        c.handle(
            &mut audio,
            &CadenceInput {
                killed: true,
                ..frame(MIN_REPEATS_TO_LOOP_SOUND, 0)
            },
        );
        assert!(!c.is_looping());
    }

    #[test]
    fn forced_stop_and_zero_volume_suppress_playback() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();
        c.handle(&mut audio, &frame(0, 1));

        c.stop_sfx(true);
        c.handle(&mut audio, &frame(0, 1));
        assert_eq!(audio.calls.last(), Some(&AudioCall::Stop));
        c.handle(&mut audio, &frame(9, 1));
        assert_eq!(audio.calls.len(), 2);

        c.stop_sfx(false);
        c.set_general_volume(0.0);
        c.handle(&mut audio, &frame(9, 1));
        assert_eq!(audio.calls.len(), 2);
    }

    #[test]
    fn volume_change_is_forwarded_while_playing() {
        let mut c = cadence();
        let mut audio = RecordingAudio::default();
        c.handle(&mut audio, &frame(4, 0));
        c.set_entity_volume(1.0);
        c.handle(&mut audio, &frame(4, 0));
        assert_eq!(audio.calls.last(), Some(&AudioCall::SetVolume(0.8)));
    }
}
