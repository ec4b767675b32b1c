//! Keyboard tracking
//!
//! Keys are identified by `KeyboardEvent.code` so bindings follow the
//! physical layout. Held keys are sampled once per frame; restart is an
//! edge that fires at most once per press.

use std::collections::HashSet;

use crate::sim::TickInput;

const LEFT_KEYS: &[&str] = &["ArrowLeft", "KeyA"];
const RIGHT_KEYS: &[&str] = &["ArrowRight", "KeyD"];
const JUMP_KEYS: &[&str] = &["Space", "ArrowUp", "KeyW"];
const RESTART_KEY: &str = "KeyR";

/// Keys the game consumes; the page should not scroll on these
pub fn is_game_key(code: &str) -> bool {
    code == RESTART_KEY || [LEFT_KEYS, RIGHT_KEYS, JUMP_KEYS].iter().any(|keys| keys.contains(&code))
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    restart_pending: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        // Auto-repeat delivers keydown again without a keyup
        let fresh = self.held.insert(code.to_string());
        if fresh && code == RESTART_KEY {
            self.restart_pending = true;
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// Sample the frame's input and consume the restart edge
    pub fn snapshot(&mut self) -> TickInput {
        let restart = std::mem::take(&mut self.restart_pending);
        TickInput {
            left: self.any_held(LEFT_KEYS),
            right: self.any_held(RIGHT_KEYS),
            jump: self.any_held(JUMP_KEYS),
            restart,
        }
    }
}
