//! Fixed timestep simulation tick
//!
//! Core game loop that advances a round deterministically.

use std::cmp::Ordering;

use super::collision::arrival;
use super::state::{GameEvent, Lane, RoundPhase, RoundState};

/// Input commands for a single tick (one-shot presses, not held state)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Up arrow
    pub move_up: bool,
    /// Down, left or right arrow
    pub move_down: bool,
    /// Enter
    pub restart: bool,
    /// P
    pub pause: bool,
    /// Lane under a pointer tap
    pub tap_lane: Option<usize>,
    /// Idle/demo mode - autopilot drives the car
    pub idle_mode: bool,
}

impl TickInput {
    /// Requested lane change for a car in `lane`: -1, 0 or +1.
    /// Up wins when both directions are requested and possible.
    fn lane_direction(&self, lane: Lane, lane_count: u8) -> i8 {
        let tap = self.tap_lane.map(|t| t.cmp(&lane.index()));

        if (self.move_up || tap == Some(Ordering::Less)) && lane.up().is_some() {
            return -1;
        }
        if (self.move_down || tap == Some(Ordering::Greater)) && lane.down(lane_count).is_some() {
            return 1;
        }
        0
    }

    fn wants_restart(&self) -> bool {
        self.restart || self.tap_lane.is_some()
    }
}

/// Advance the round by one fixed timestep
///
/// Returns the events the host should react to (sound cues, HUD, saving).
pub fn tick(state: &mut RoundState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    // Game over freezes everything but restart
    if state.is_game_over() {
        if input.wants_restart() {
            state.restart();
            events.push(GameEvent::RoundStarted {
                high_score: state.high_score(),
            });
        }
        return events;
    }

    if input.pause {
        match state.phase() {
            RoundPhase::Playing => {
                state.set_phase(RoundPhase::Paused);
                events.push(GameEvent::Paused);
                return events;
            }
            RoundPhase::Paused => {
                state.set_phase(RoundPhase::Playing);
                events.push(GameEvent::Resumed);
            }
            RoundPhase::GameOver => {}
        }
    }

    if state.is_paused() {
        return events;
    }

    // At most one lane change per forward step
    if state.allow_move() {
        let direction = input.lane_direction(state.car().lane(), state.tuning().lane_count);
        if direction != 0 {
            state.car_mut().queue_lane_change(direction);
            state.set_allow_move(false);
        }
    }

    let interval = u64::from(state.tuning().move_interval_ticks);
    if state.time_ticks() % interval == 0 {
        let speed = state.car_speed();
        let lane_count = state.tuning().lane_count;
        state.car_mut().step_forward(speed, lane_count);
        state.set_allow_move(true);
    }

    resolve_arrival(state, &mut events);
    state.advance_clock();

    events
}

/// Score or end the round if the car reached a garage this tick
fn resolve_arrival(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    let Some(lane) = arrival(state.car(), state.garages(), state.tuning()) else {
        return;
    };

    let car_color = state.car().color();
    let garage_color = state.garage_in_lane(lane).color;

    if car_color == garage_color {
        let new_high = state.record_match();
        let score = state.score();
        log::info!("{} car parked in lane {}: score {}", car_color, lane, score);
        events.push(GameEvent::Match {
            lane,
            color: car_color,
            score,
        });
        if new_high {
            events.push(GameEvent::NewHighScore { score });
        }
        state.respawn_car();
    } else {
        state.set_phase(RoundPhase::GameOver);
        log::info!(
            "Game over: {} car hit {} garage in lane {} (score {})",
            car_color,
            garage_color,
            lane,
            state.score()
        );
        events.push(GameEvent::Mismatch {
            lane,
            car: car_color,
            garage: garage_color,
            score: state.score(),
        });
    }
}

/// Demo AI: restart after game over, otherwise steer toward the nearest
/// garage of the car's color. Stays put when no garage matches.
pub fn autopilot(state: &RoundState, input: &TickInput) -> TickInput {
    let mut input = input.clone();

    if state.is_game_over() {
        input.restart = true;
        return input;
    }

    let car = state.car();
    if car.pending_direction() != 0 {
        // Already turning at the next forward step
        input.move_up = false;
        input.move_down = false;
        input.tap_lane = None;
        return input;
    }

    let lane = car.lane().index();
    let target = state
        .garages()
        .iter()
        .filter(|g| g.color == car.color())
        .map(|g| g.lane.index())
        .min_by_key(|&l| l.abs_diff(lane));

    if let Some(target) = target {
        input.move_up = target < lane;
        input.move_down = target > lane;
        input.tap_lane = None;
    }

    input
}
