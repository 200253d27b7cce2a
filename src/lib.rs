//! Color Garage - a lane-switching color-matching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round state, collisions, tick)
//! - `tuning`: Data-driven gameplay configuration
//! - `renderer`: Backend-agnostic draw list built from a round snapshot
//! - `platform`: Input edge detection and fixed-timestep clock
//! - `audio`: Sound cue dispatch for match/mismatch events
//! - `persistence`: Versioned JSON saves with backup rotation

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{DifficultyPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side of one grid square; lanes, car and garages are all one square
    pub const SQUARE_SIZE: f32 = 200.0;
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1600.0;
    pub const LANE_COUNT: u8 = 5;
    /// Upper bound on configurable lanes
    pub const MAX_LANES: u8 = 16;

    /// Car travels one square per second
    pub const BASE_SPEED: f32 = SQUARE_SIZE / TICK_RATE as f32;
}
