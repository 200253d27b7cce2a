//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Garages iterated in lane order
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod palette;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{arrival, car_garage_overlap, reached_wall};
pub use palette::CarColor;
pub use rect::Rect;
pub use state::{Car, GameEvent, Garage, Lane, LayoutError, RoundPhase, RoundState};
pub use tick::{TickInput, autopilot, tick};

/// Lane under a screen-space y coordinate, for pointer taps
pub fn lane_from_y(y: f32, tuning: &crate::Tuning) -> Option<usize> {
    if !(0.0..tuning.field_height()).contains(&y) {
        return None;
    }
    Some((y / tuning.lane_height) as usize)
}
