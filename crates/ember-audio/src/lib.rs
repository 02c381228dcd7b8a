//! Ember Audio - Kira playback for particle sound effects
//!
//! `KiraAudio` implements the particle crate's `AudioBackend` on top of a Kira
//! `AudioManager`, running silent when no output device exists.

pub mod engine;

pub use engine::{KiraAudio, Stage};
