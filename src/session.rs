//! Game session controller
//!
//! Owns the level instance, the player and session progress, and turns
//! simulation events into transitions: pickups, deaths, level advance, win.
//!
//! Death resets are deferred by the host (about a second of death effect).
//! Each death hands out a [`ResetTicket`] stamped with the current
//! generation. Any later transition bumps the generation, so a ticket that
//! arrives after a restart or level change is ignored.

use crate::audio::SoundEffect;
use crate::levels::LevelSet;
use crate::sim::{
    Level, LevelTemplate, PlayerState, SessionState, SessionStatus, SimEvent, TickInput, step,
};
use crate::tuning::PhysicsTuning;

/// Permission to reset the level for one death episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTicket {
    generation: u64,
}

impl ResetTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything one frame produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<SimEvent>,
    /// Audio cues to fire, in order
    pub cues: Vec<SoundEffect>,
    /// Set on the frame the player died; schedule a reset with it
    pub reset: Option<ResetTicket>,
}

pub struct GameSession {
    levels: LevelSet,
    tuning: PhysicsTuning,
    state: SessionState,
    level: Level,
    player: PlayerState,
    generation: u64,
    frame: u64,
}

impl GameSession {
    /// Start a session on the first level
    pub fn new(levels: LevelSet, tuning: PhysicsTuning) -> Self {
        let first = &levels[0];
        let level = Level::instantiate(first);
        let player = PlayerState::with_size(first.spawn, tuning.player_size);
        log::info!("Session started: {} levels", levels.len());

        Self {
            levels,
            tuning,
            state: SessionState::default(),
            level,
            player,
            generation: 0,
            frame: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    /// Current death/transition generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frames simulated since the session started
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn template(&self) -> &LevelTemplate {
        &self.levels[self.state.current_level_index]
    }

    /// Run one frame against an input snapshot
    pub fn update(&mut self, input: &TickInput) -> FrameReport {
        let mut report = FrameReport::default();
        if self.state.status == SessionStatus::Won {
            return report;
        }

        if input.restart {
            log::info!("Level {} restarted", self.level.id);
            self.reset_level();
        }

        self.frame += 1;
        let events = step(
            &mut self.player,
            &mut self.level,
            &mut self.state.collected_count,
            input,
            &self.tuning,
        );

        for event in &events {
            match *event {
                SimEvent::Jumped => report.cues.push(SoundEffect::Jump),
                SimEvent::Collected { id } => {
                    log::debug!(
                        "Collected {} ({}/{})",
                        id,
                        self.state.collected_count,
                        self.level.required_collectibles
                    );
                    report.cues.push(SoundEffect::Collect);
                }
                SimEvent::Died(cause) => {
                    log::debug!("Player died on level {}: {:?}", self.level.id, cause);
                    self.generation += 1;
                    report.cues.push(SoundEffect::Death);
                    report.reset = Some(ResetTicket {
                        generation: self.generation,
                    });
                }
                SimEvent::PortalEntered => {
                    if self.advance_level() == SessionStatus::Won {
                        report.cues.push(SoundEffect::Win);
                    }
                }
            }
        }

        report.events = events;
        report
    }

    /// Apply a deferred death reset. Returns false for a stale ticket.
    pub fn apply_reset(&mut self, ticket: ResetTicket) -> bool {
        if ticket.generation != self.generation || !self.player.dead {
            log::debug!(
                "Ignoring stale reset (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.reset_level();
        true
    }

    /// Fresh level instance, player back at spawn, collected count cleared
    pub fn reset_level(&mut self) {
        self.generation += 1;
        let level = Level::instantiate(self.template());
        self.player.respawn(level.spawn);
        self.level = level;
        self.state.collected_count = 0;
    }

    /// Move to the next level, or finish the session after the last one
    pub fn advance_level(&mut self) -> SessionStatus {
        let index = self.state.current_level_index;
        if self.levels.is_last(index) {
            self.generation += 1;
            self.state.status = SessionStatus::Won;
            log::info!("All {} levels cleared", self.levels.len());
        } else {
            self.state.current_level_index = index + 1;
            self.reset_level();
            log::info!(
                "Advanced to level {}/{}",
                self.state.current_level_index + 1,
                self.levels.len()
            );
        }
        self.state.status
    }

    /// Back to the first level with a clean slate
    pub fn restart_game(&mut self) {
        self.state.current_level_index = 0;
        self.state.status = SessionStatus::Playing;
        self.reset_level();
        log::info!("Game restarted");
    }
}
