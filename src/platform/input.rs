//! Keyboard and pointer input latching
//!
//! Hosts report raw key-down/key-up events (including OS auto-repeat). The
//! latch records a press only on the transition from released to held, so a
//! held key never repeats a lane change.

use std::collections::HashSet;

use crate::sim::{TickInput, lane_from_y};
use crate::tuning::Tuning;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Pause,
    /// Toggles the autopilot
    Idle,
}

impl Key {
    /// Map a DOM-style key name ("ArrowUp", "Enter", "p", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            "Enter" => Some(Key::Enter),
            "p" | "P" => Some(Key::Pause),
            "i" | "I" => Some(Key::Idle),
            _ => None,
        }
    }
}

/// Collects input between ticks
#[derive(Debug, Default)]
pub struct InputLatch {
    held: HashSet<Key>,
    pending: TickInput,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down (or the OS repeated it)
    pub fn key_down(&mut self, key: Key) {
        if !self.held.insert(key) {
            return;
        }
        match key {
            Key::Up => self.pending.move_up = true,
            Key::Down | Key::Left | Key::Right => self.pending.move_down = true,
            Key::Enter => self.pending.restart = true,
            Key::Pause => self.pending.pause = true,
            Key::Idle => {
                self.pending.idle_mode = !self.pending.idle_mode;
                log::info!("Idle mode: {}", self.pending.idle_mode);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Tap or click at screen-space `y`; taps outside the lanes are ignored
    pub fn pointer_tap(&mut self, y: f32, tuning: &Tuning) {
        if let Some(lane) = lane_from_y(y, tuning) {
            self.pending.tap_lane = Some(lane);
        }
    }

    /// Input for the next tick. One-shot presses are cleared; idle mode
    /// stays until toggled.
    pub fn take(&mut self) -> TickInput {
        let input = self.pending.clone();
        self.pending = TickInput {
            idle_mode: input.idle_mode,
            ..Default::default()
        };
        input
    }
}
