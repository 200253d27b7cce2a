//! Round state and core simulation types
//!
//! Everything the tick function reads or writes lives here. Fields that carry
//! invariants (lane bounds, garage count, score monotonicity) are private and
//! only change through the simulator.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::palette::CarColor;
use super::rect::Rect;
use crate::tuning::{GaragePolicy, Tuning, TuningError};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Car is driving toward the garages
    Playing,
    /// Frozen until pause is toggled again
    Paused,
    /// Wrong garage; frozen until restart
    GameOver,
}

/// A lane index that is always inside the lane count it was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Lane(u8);

impl Lane {
    /// `None` if `index` is not below `lane_count`
    pub fn new(index: usize, lane_count: u8) -> Option<Self> {
        (index < usize::from(lane_count)).then(|| Self(index as u8))
    }

    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Lane above, if any
    pub fn up(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Lane below, if any
    pub fn down(self, lane_count: u8) -> Option<Self> {
        let next = self.0 + 1;
        (next < lane_count).then_some(Self(next))
    }

    /// Move by -1/0/+1, clamped to the lane range
    fn step(self, direction: i8, lane_count: u8) -> Self {
        match direction {
            d if d < 0 => self.up().unwrap_or(self),
            d if d > 0 => self.down(lane_count).unwrap_or(self),
            _ => self,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    lane: Lane,
    /// Position of the left edge along the travel axis
    x: f32,
    color: CarColor,
    /// Lane change queued for the next forward step (-1 up, +1 down)
    direction: i8,
}

impl Car {
    /// A car at the start of the travel axis
    pub fn new(lane: Lane, color: CarColor) -> Self {
        Self {
            lane,
            x: 0.0,
            color,
            direction: 0,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn color(&self) -> CarColor {
        self.color
    }

    /// Queued lane change (-1, 0 or +1)
    pub fn pending_direction(&self) -> i8 {
        self.direction
    }

    /// Bounding box in screen space
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        tuning.car_rect(self.lane.index(), self.x)
    }

    pub(crate) fn queue_lane_change(&mut self, direction: i8) {
        self.direction = direction.signum();
    }

    /// One forward step: advance along the travel axis and apply the queued
    /// lane change
    pub(crate) fn step_forward(&mut self, speed: f32, lane_count: u8) {
        self.x += speed;
        self.lane = self.lane.step(self.direction, lane_count);
        self.direction = 0;
    }
}

/// A garage at the end of a lane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Garage {
    pub lane: Lane,
    pub color: CarColor,
    pub rect: Rect,
}

/// Something the host should react to (sound, HUD, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Fresh round after restart
    RoundStarted { high_score: u32 },
    /// Car entered a garage of its own color
    Match {
        lane: Lane,
        color: CarColor,
        score: u32,
    },
    /// Score passed the previous high score
    NewHighScore { score: u32 },
    /// Car entered a garage of another color; the round is over
    Mismatch {
        lane: Lane,
        car: CarColor,
        garage: CarColor,
        score: u32,
    },
    Paused,
    Resumed,
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("expected {expected} garage colors, got {actual}")]
    GarageCount { expected: usize, actual: usize },
    #[error("car lane {lane} is outside {lane_count} lanes")]
    CarLane { lane: Lane, lane_count: u8 },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Complete round state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    /// Seed the RNG was created from
    seed: u64,
    rng: Pcg32,
    tuning: Tuning,
    car: Car,
    /// One per lane, indexed by lane
    garages: Vec<Garage>,
    score: u32,
    /// Survives restarts for the lifetime of the process
    high_score: u32,
    phase: RoundPhase,
    /// Set on each forward step; cleared by a lane change request
    allow_move: bool,
    /// Ticks processed while playing
    time_ticks: u64,
}

impl RoundState {
    /// Start a round with a random car and freshly assigned garages
    pub fn new(tuning: Tuning, seed: u64, high_score: u32) -> Result<Self, TuningError> {
        tuning.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let car = random_car(&mut rng, tuning.lane_count);
        let garages = assign_garages(&mut rng, &tuning);

        let state = Self {
            seed,
            rng,
            tuning,
            car,
            garages,
            score: 0,
            high_score,
            phase: RoundPhase::Playing,
            allow_move: false,
            time_ticks: 0,
        };
        log::info!(
            "Round started: seed={}, car {} in lane {}, high score {}",
            seed,
            state.car.color,
            state.car.lane,
            high_score
        );
        Ok(state)
    }

    /// Start a round with an explicit car and garage colors
    pub fn with_layout(
        tuning: Tuning,
        seed: u64,
        high_score: u32,
        car: Car,
        garage_colors: &[CarColor],
    ) -> Result<Self, LayoutError> {
        let mut state = Self::new(tuning, seed, high_score)?;
        let lane_count = state.tuning.lane_count;

        if garage_colors.len() != usize::from(lane_count) {
            return Err(LayoutError::GarageCount {
                expected: usize::from(lane_count),
                actual: garage_colors.len(),
            });
        }
        if car.lane.index() >= usize::from(lane_count) {
            return Err(LayoutError::CarLane {
                lane: car.lane,
                lane_count,
            });
        }

        for (garage, &color) in state.garages.iter_mut().zip(garage_colors) {
            garage.color = color;
        }
        state.car = car;
        Ok(state)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn garages(&self) -> &[Garage] {
        &self.garages
    }

    /// Garage at the end of the car's current lane
    pub fn garage_in_lane(&self, lane: Lane) -> &Garage {
        &self.garages[lane.index()]
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RoundPhase::Paused
    }

    pub fn allow_move(&self) -> bool {
        self.allow_move
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Current forward speed
    pub fn car_speed(&self) -> f32 {
        self.tuning.speed_for_score(self.score)
    }

    pub(crate) fn set_phase(&mut self, phase: RoundPhase) {
        self.phase = phase;
    }

    pub(crate) fn car_mut(&mut self) -> &mut Car {
        &mut self.car
    }

    pub(crate) fn set_allow_move(&mut self, allow: bool) {
        self.allow_move = allow;
    }

    pub(crate) fn advance_clock(&mut self) {
        self.time_ticks += 1;
    }

    /// Count a match. Returns true if this set a new high score.
    pub(crate) fn record_match(&mut self) -> bool {
        self.score += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Continue after a match: new car, garages and score untouched
    pub(crate) fn respawn_car(&mut self) {
        self.car = random_car(&mut self.rng, self.tuning.lane_count);
        self.allow_move = false;
    }

    /// Full restart: new car and garages, score cleared, high score kept
    pub(crate) fn restart(&mut self) {
        self.car = random_car(&mut self.rng, self.tuning.lane_count);
        self.garages = assign_garages(&mut self.rng, &self.tuning);
        self.score = 0;
        self.phase = RoundPhase::Playing;
        self.allow_move = false;
        self.time_ticks = 0;
        log::info!(
            "Round restarted: car {} in lane {}, high score {}",
            self.car.color,
            self.car.lane,
            self.high_score
        );
    }
}

fn random_color(rng: &mut Pcg32) -> CarColor {
    CarColor::ALL[rng.random_range(0..CarColor::ALL.len())]
}

fn random_car(rng: &mut Pcg32, lane_count: u8) -> Car {
    let lane = Lane(rng.random_range(0..lane_count));
    Car::new(lane, random_color(rng))
}

fn assign_garages(rng: &mut Pcg32, tuning: &Tuning) -> Vec<Garage> {
    (0..tuning.lane_count)
        .map(|i| {
            let lane = Lane(i);
            let color = match tuning.garage_policy {
                GaragePolicy::PaletteOrder => CarColor::from_index(lane.index()),
                GaragePolicy::Random => random_color(rng),
            };
            Garage {
                lane,
                color,
                rect: tuning.garage_rect(lane.index()),
            }
        })
        .collect()
}
