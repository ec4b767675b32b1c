//! Per-frame simulation module
//!
//! All gameplay physics lives here. This module must stay pure:
//! - One step per animation frame, no wall-clock time
//! - Stable iteration order (level list order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Contact, collect_overlapping, first_hazard_hit, portal_reached, resolve_platform, resolve_platforms};
pub use level::{Entity, EntityKind, Level, LevelError, LevelTemplate};
pub use rect::Rect;
pub use state::{AnimState, DeathCause, Facing, PlayerState, SessionState, SessionStatus, SimEvent};
pub use tick::{TickInput, integrate, resolve_horizontal, step, try_jump};
