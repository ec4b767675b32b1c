//! Scripted play without a browser
//!
//! Drives a [`GameSession`] with a frame-indexed input script, standing in
//! for the host: cues go to an [`AudioSink`] and death resets are applied
//! after a fixed number of frames instead of a timer.

use crate::audio::AudioSink;
use crate::session::{GameSession, ResetTicket};
use crate::sim::{SessionStatus, SimEvent, TickInput};

/// Last frame the level-one route holds right
const LEVEL_ONE_RUN_FRAMES: u64 = 167;
/// Frames on which the level-one route presses jump
const LEVEL_ONE_JUMPS: [u64; 3] = [19, 60, 105];

/// Input that clears the first built-in level from spawn with default tuning.
///
/// Frames count from 1. The route lands on the ground, hops up the three
/// ledges picking up each banana in flight, then walks off the last ledge
/// and drops into the portal.
pub fn level_one_route(frame: u64) -> TickInput {
    TickInput {
        right: frame <= LEVEL_ONE_RUN_FRAMES,
        jump: LEVEL_ONE_JUMPS.contains(&frame),
        ..Default::default()
    }
}

/// What a scripted run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub frames: u64,
    pub jumps: u32,
    pub collected: u32,
    pub deaths: u32,
    /// 1-based level the session ended on
    pub level_reached: usize,
    pub won: bool,
}

/// Play the current level until the session leaves it, wins, or
/// `max_frames` pass.
///
/// `script` is called with the frame number, counted from 1. A death reset
/// is applied `reset_delay_frames` frames after the death.
pub fn play_level<F>(
    session: &mut GameSession,
    mut script: F,
    audio: &mut dyn AudioSink,
    reset_delay_frames: u64,
    max_frames: u64,
) -> Summary
where
    F: FnMut(u64) -> TickInput,
{
    let start_index = session.state().current_level_index;
    let mut pending: Option<(u64, ResetTicket)> = None;
    let mut summary = Summary::default();

    for frame in 1..=max_frames {
        if let Some((due, ticket)) = pending {
            if frame >= due {
                session.apply_reset(ticket);
                pending = None;
            }
        }

        let report = session.update(&script(frame));
        for cue in &report.cues {
            audio.play(*cue);
        }

        for event in &report.events {
            log::info!("frame {}: {:?}", frame, event);
            match event {
                SimEvent::Jumped => summary.jumps += 1,
                SimEvent::Collected { .. } => summary.collected += 1,
                SimEvent::Died(_) => summary.deaths += 1,
                SimEvent::PortalEntered => {}
            }
        }
        if let Some(ticket) = report.reset {
            pending = Some((frame + reset_delay_frames, ticket));
        }

        summary.frames = frame;
        if session.state().status == SessionStatus::Won {
            summary.won = true;
            break;
        }
        if session.state().current_level_index != start_index {
            break;
        }
    }

    summary.level_reached = session.state().current_level_index + 1;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhysicsTuning;
    use crate::audio::NullAudio;
    use crate::levels::LevelSet;

    fn session() -> GameSession {
        GameSession::new(LevelSet::builtin().unwrap(), PhysicsTuning::default())
    }

    #[test]
    fn test_route_clears_level_one() {
        let mut s = session();
        let summary = play_level(&mut s, level_one_route, &mut NullAudio, 60, 600);

        assert_eq!(summary.jumps, 3);
        assert_eq!(summary.collected, 3);
        assert_eq!(summary.deaths, 0);
        assert_eq!(summary.frames, 195);
        assert_eq!(summary.level_reached, 2);
        assert!(!summary.won);
        assert_eq!(s.state().current_level_index, 1);
        assert_eq!(s.state().collected_count, 0);
    }

    #[test]
    fn test_holding_right_dies_and_respawns() {
        let mut s = session();
        let right = |_: u64| TickInput {
            right: true,
            ..Default::default()
        };
        let summary = play_level(&mut s, right, &mut NullAudio, 60, 200);

        // First spike at frame 69, reset at 129, same spike again at 197
        assert_eq!(summary.deaths, 2);
        assert_eq!(summary.collected, 0);
        assert_eq!(summary.frames, 200);
        assert_eq!(summary.level_reached, 1);
        assert!(s.player().dead);
    }

    #[test]
    fn test_stale_reset_is_dropped_after_manual_restart() {
        let mut s = session();
        // Die on the first spike, then restart by hand before the reset is due
        let script = |frame: u64| TickInput {
            right: frame < 80,
            restart: frame == 80,
            ..Default::default()
        };
        let summary = play_level(&mut s, script, &mut NullAudio, 60, 140);

        assert_eq!(summary.deaths, 1);
        assert!(!s.player().dead);
        // The late reset at frame 129 did not pull the player back to spawn
        assert!(s.player().grounded);
    }
}
