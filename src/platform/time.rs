//! Fixed timestep accumulator
//!
//! Converts variable frame times into a whole number of simulation ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted; longer stalls (tab switch, debugger) are cut
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_substeps: u32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_DT)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32, max_frame_dt: f32) -> Self {
        Self {
            dt,
            max_substeps,
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time and return how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }

        // Prevent spiral of death: drop time we could not catch up on
        if substeps == self.max_substeps && self.accumulator >= self.dt {
            self.accumulator %= self.dt;
        }

        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_per_sim_frame() {
        let mut step = FixedStep::default();
        for _ in 0..120 {
            assert_eq!(step.advance(SIM_DT), 1);
        }
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut step = FixedStep::new(0.25, 8, 1.0);
        assert_eq!(step.advance(0.125), 0);
        assert_eq!(step.advance(0.125), 1);
        assert_eq!(step.advance(0.5), 2);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut step = FixedStep::new(0.125, 2, 1.0);
        assert_eq!(step.advance(1.0), 2);
        // Backlog was dropped, not carried into the next frame
        assert_eq!(step.advance(0.0), 0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut step = FixedStep::new(0.125, 100, 0.5);
        assert_eq!(step.advance(10.0), 4);
        assert_eq!(step.advance(-1.0), 0);
    }
}
