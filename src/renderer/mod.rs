//! Presentation layer
//!
//! Rendering reads a [`FrameView`] and never mutates game state. Layout and
//! animation math live here as plain functions; the Canvas 2D backend only
//! issues draw calls.

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::DVec2;

use crate::consts::{V_HEIGHT, V_WIDTH};
use crate::session::GameSession;
use crate::sim::{AnimState, Level, PlayerState, Rect, SessionStatus};

/// Colors, as CSS strings
pub mod palette {
    pub const SKY_TOP: &str = "#87CEEB";
    pub const SKY_BOTTOM: &str = "#E0F6FF";
    pub const MOUNTAINS: &str = "#6BA7C1";
    pub const HILLS: &str = "#4A8D7E";
    pub const EARTH: &str = "#5D4037";
    pub const GRASS: &str = "#8BC34A";
    pub const SPIKE: &str = "#78909C";
    pub const PATROL: &str = "#FFC107";
    pub const STRIPE: &str = "#212121";
    pub const BANANA: &str = "#FFEB3B";
    pub const PORTAL_READY: &str = "#E91E63";
    pub const PORTAL_CLOSED: &str = "#9E9E9E";
    pub const PORTAL_GLOW: &str = "rgba(233, 30, 99, 0.3)";
    pub const SPARKLE: &str = "#FFF";
    pub const FUR: &str = "#795548";
    pub const FUR_LIGHT: &str = "#D7CCC8";
    pub const WIN_BACKDROP: &str = "rgba(255, 202, 40, 0.95)";
    pub const WIN_TEXT: &str = "#5D3A00";
    pub const HUD_PANEL: &str = "rgba(255, 255, 255, 0.9)";
}

/// Height of the grass strip on top of platforms
pub const GRASS_HEIGHT: f64 = 10.0;
/// Sparkles drawn inside an open portal each frame
pub const PORTAL_SPARKLES: usize = 5;
/// Particles in the death burst
pub const DEATH_PARTICLES: usize = 8;
pub const DEATH_BURST_RADIUS: f64 = 30.0;

/// "Play again" button on the win screen
pub const PLAY_AGAIN_BUTTON: Rect = Rect::new(V_WIDTH / 2.0 - 150.0, V_HEIGHT / 2.0 + 80.0, 300.0, 70.0);

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub player: &'a PlayerState,
    pub level: &'a Level,
    pub collected_count: u32,
    /// 1-based
    pub level_number: usize,
    pub level_count: usize,
    pub status: SessionStatus,
    /// Wall-clock animation time; drives decoration only
    pub elapsed_ms: f64,
    pub reduced_motion: bool,
}

impl<'a> FrameView<'a> {
    pub fn from_session(session: &'a GameSession, elapsed_ms: f64, reduced_motion: bool) -> Self {
        Self {
            player: session.player(),
            level: session.level(),
            collected_count: session.state().collected_count,
            level_number: session.state().current_level_index + 1,
            level_count: session.levels().len(),
            status: session.state().status,
            elapsed_ms,
            reduced_motion,
        }
    }

    /// Animation clock in tenths of a second, frozen under reduced motion
    pub fn anim_time(&self) -> f64 {
        if self.reduced_motion { 0.0 } else { self.elapsed_ms / 100.0 }
    }

    pub fn portal_ready(&self) -> bool {
        self.collected_count >= self.level.required_collectibles
    }

    pub fn level_label(&self) -> String {
        format!("Level {}/{}", self.level_number, self.level_count)
    }

    pub fn banana_label(&self) -> String {
        format!("{} / {}", self.collected_count, self.level.required_collectibles)
    }
}

/// Anything that can draw a frame
pub trait RenderSink {
    fn render(&mut self, view: &FrameView<'_>);
}

/// Outline of one parallax layer, left to right across the playfield
pub fn parallax_profile(offset: f64, amplitude: f64, baseline: f64, frequency: f64) -> Vec<DVec2> {
    (0..=(V_WIDTH as usize))
        .step_by(10)
        .map(|x| {
            let x = x as f64;
            DVec2::new(x, baseline + (x * 0.005 * frequency + offset).sin() * amplitude)
        })
        .collect()
}

/// Sprite offsets for the current animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    /// Upward body offset
    pub bounce: f64,
    /// Leg swing
    pub limb_angle: f64,
    /// Hand height relative to the body center
    pub arm_y: f64,
}

impl PlayerPose {
    pub fn for_anim(anim: AnimState, time: f64) -> Self {
        match anim {
            AnimState::Run => Self {
                bounce: (time * 0.2).sin().abs() * 5.0,
                limb_angle: (time * 0.2).sin() * 0.5,
                arm_y: 5.0,
            },
            AnimState::Jump => Self {
                bounce: -5.0,
                limb_angle: 0.0,
                arm_y: -10.0,
            },
            AnimState::Idle => Self {
                bounce: 0.0,
                limb_angle: 0.0,
                arm_y: 5.0,
            },
        }
    }
}

/// Banana rotation in radians
pub fn banana_sway(elapsed_ms: f64) -> f64 {
    (elapsed_ms / 200.0).sin() * 0.2
}

/// Particle centers around the player's last position
pub fn death_burst(player: &PlayerState) -> [DVec2; DEATH_PARTICLES] {
    let center = player.rect().center();
    std::array::from_fn(|i| {
        let angle = i as f64 / DEATH_PARTICLES as f64 * std::f64::consts::TAU;
        center + DVec2::from_angle(angle) * DEATH_BURST_RADIUS
    })
}

/// Whether a click in playfield coordinates lands on "play again"
pub fn play_again_hit(point: DVec2) -> bool {
    let b = PLAY_AGAIN_BUTTON;
    point.x >= b.left() && point.x <= b.right() && point.y >= b.top() && point.y <= b.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhysicsTuning;
    use crate::levels::LevelSet;

    #[test]
    fn test_view_labels() {
        let session = GameSession::new(LevelSet::builtin().unwrap(), PhysicsTuning::default());
        let view = FrameView::from_session(&session, 0.0, false);
        assert_eq!(view.level_label(), "Level 1/3");
        assert_eq!(view.banana_label(), "0 / 3");
        assert!(!view.portal_ready());
    }

    #[test]
    fn test_reduced_motion_freezes_clock() {
        let session = GameSession::new(LevelSet::builtin().unwrap(), PhysicsTuning::default());
        assert_eq!(FrameView::from_session(&session, 1234.0, true).anim_time(), 0.0);
        assert!((FrameView::from_session(&session, 1234.0, false).anim_time() - 12.34).abs() < 1e-9);
    }

    #[test]
    fn test_parallax_covers_width() {
        let pts = parallax_profile(0.0, 100.0, 300.0, 0.4);
        assert_eq!(pts.first().unwrap().x, 0.0);
        assert_eq!(pts.last().unwrap().x, V_WIDTH);
        assert!(pts.iter().all(|p| (200.0..=400.0).contains(&p.y)));
    }

    #[test]
    fn test_poses() {
        assert_eq!(PlayerPose::for_anim(AnimState::Jump, 3.0).bounce, -5.0);
        assert_eq!(PlayerPose::for_anim(AnimState::Idle, 3.0).limb_angle, 0.0);
        let run = PlayerPose::for_anim(AnimState::Run, 7.0);
        assert!(run.bounce >= 0.0 && run.bounce <= 5.0);
    }

    #[test]
    fn test_death_burst_ring() {
        let player = PlayerState::spawn_at(DVec2::new(100.0, 500.0));
        let center = player.rect().center();
        for p in death_burst(&player) {
            assert!((p.distance(center) - DEATH_BURST_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn test_play_again_hit() {
        assert!(play_again_hit(PLAY_AGAIN_BUTTON.center()));
        assert!(!play_again_hit(DVec2::ZERO));
    }
}
