//! Data-driven physics tuning
//!
//! Every value is per frame, matching the fixed one-step-per-frame loop.
//! Missing JSON fields fall back to the defaults in [`crate::consts`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f64,
    /// Negative = upward
    pub jump_force: f64,
    pub move_speed: f64,
    pub friction: f64,
    pub friction_snap: f64,
    /// Players whose top edge passes below this die
    pub playfield_height: f64,
    pub player_size: DVec2,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            friction: FRICTION,
            friction_snap: FRICTION_SNAP,
            playfield_height: V_HEIGHT,
            player_size: DVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }
}

impl PhysicsTuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse host-supplied overrides, falling back to defaults on bad input
    pub fn from_optional_json(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) if tuning.is_sane() => {
                log::info!("Physics tuning overridden: {:?}", tuning);
                tuning
            }
            Ok(tuning) => {
                log::warn!("Ignoring unusable physics tuning: {:?}", tuning);
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring malformed physics tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Finite values and a player with a positive size
    fn is_sane(&self) -> bool {
        [
            self.gravity,
            self.jump_force,
            self.move_speed,
            self.friction,
            self.friction_snap,
            self.playfield_height,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.player_size.is_finite()
            && self.player_size.cmpgt(DVec2::ZERO).all()
    }
}
