//! Player-facing preferences
//!
//! Read once at startup from an optional JSON blob (the canvas
//! `data-settings` attribute on web). Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::DEATH_RESET_DELAY_MS;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    /// Pause between a death and the level reset
    pub death_delay_ms: u32,

    // === Accessibility ===
    /// Freeze decorative motion (banana sway, portal sparkles, death burst)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            death_delay_ms: DEATH_RESET_DELAY_MS,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings, clamping volumes into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Parse if present, falling back to defaults on bad input
    pub fn from_optional_json(json: Option<&str>) -> Self {
        match json {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Volume applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Death delay expressed in simulation frames at `frame_hz`
    pub fn death_delay_frames(&self, frame_hz: u32) -> u64 {
        (self.death_delay_ms as u64 * frame_hz as u64).div_ceil(1000)
    }
}
