//! Audio cues
//!
//! The session reports cues as plain values; a sink turns them into sound.
//! Playback failure is never fatal.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump started
    Jump,
    /// Banana picked up
    Collect,
    /// Player died
    Death,
    /// Final portal entered
    Win,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Collect => "collect",
            SoundEffect::Death => "death",
            SoundEffect::Win => "win",
        }
    }
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every cue. Used headless and when no audio device exists.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("cue {}", effect.as_str());
    }
}
