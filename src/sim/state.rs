//! Player, session and event types

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};

/// Horizontal facing, used to mirror the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Animation state picked by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Run,
    Jump,
}

/// The controlled character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: DVec2,
    pub grounded: bool,
    pub facing: Facing,
    pub anim: AnimState,
    /// Set on death; the step is frozen until the level resets
    pub dead: bool,
}

impl PlayerState {
    /// A fresh player at `spawn` with zero velocity
    pub fn spawn_at(spawn: DVec2) -> Self {
        Self::with_size(spawn, DVec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    pub fn with_size(spawn: DVec2, size: DVec2) -> Self {
        Self {
            position: spawn,
            velocity: DVec2::ZERO,
            size,
            grounded: false,
            facing: Facing::Right,
            anim: AnimState::Idle,
            dead: false,
        }
    }

    /// Move back to spawn and clear motion and death. Facing is kept.
    pub fn respawn(&mut self, spawn: DVec2) {
        self.position = spawn;
        self.velocity = DVec2::ZERO;
        self.grounded = false;
        self.anim = AnimState::Idle;
        self.dead = false;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Session-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Playing,
    /// Terminal: the last level's portal was entered
    Won,
}

/// Progress through the level set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_level_index: usize,
    /// Collectibles picked up in the current attempt
    pub collected_count: u32,
    pub status: SessionStatus,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Overlapped the hazard with this entity id
    Hazard { id: u32 },
    /// Fell below the playfield
    OutOfBounds,
}

/// Events produced by one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A jump started this frame
    Jumped,
    Died(DeathCause),
    /// Collectible with this entity id was picked up
    Collected { id: u32 },
    PortalEntered,
}
