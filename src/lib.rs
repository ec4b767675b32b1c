//! Jungle Jump - A hand-authored 2D platformer
//!
//! Core modules:
//! - `sim`: Per-frame simulation (physics, collisions, level data)
//! - `session`: Level transitions, death resets, win state
//! - `levels`: Built-in level pack
//! - `renderer`: Canvas 2D presentation
//! - `audio`: Cue playback
//! - `platform`: Browser input plumbing
//! - `tuning`: Data-driven physics constants
//! - `autopilot`: Scripted play for the native build and tests

pub mod audio;
pub mod autopilot;
pub mod levels;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{FrameReport, GameSession, ResetTicket};
pub use settings::Settings;
pub use tuning::PhysicsTuning;

/// Game configuration constants
pub mod consts {
    /// Virtual playfield dimensions (pixels)
    pub const V_WIDTH: f64 = 1280.0;
    pub const V_HEIGHT: f64 = 720.0;

    /// Downward acceleration added to vy every frame
    pub const GRAVITY: f64 = 0.6;
    /// Initial vertical velocity of a jump (negative = up)
    pub const JUMP_FORCE: f64 = -15.0;
    /// Horizontal speed while a direction is held
    pub const MOVE_SPEED: f64 = 6.0;
    /// Per-frame horizontal damping with no input held
    pub const FRICTION: f64 = 0.8;
    /// Below this |vx| friction snaps to a full stop
    pub const FRICTION_SNAP: f64 = 0.1;

    /// Player bounding box
    pub const PLAYER_WIDTH: f64 = 40.0;
    pub const PLAYER_HEIGHT: f64 = 50.0;

    /// Delay between a death and the level reset (ms)
    pub const DEATH_RESET_DELAY_MS: u32 = 1000;

    /// Nominal frame rate the per-frame constants were tuned for
    pub const FRAME_HZ: u32 = 60;
}
