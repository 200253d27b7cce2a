//! Data-driven gameplay configuration
//!
//! Everything the simulator needs to know about lane geometry, car speed and
//! rule variants. Loaded from JSON; any omitted field takes its default.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

/// How garage colors are assigned when a round starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GaragePolicy {
    /// Lane `i` gets palette entry `i`
    #[default]
    PaletteOrder,
    /// Each lane draws an independent random palette entry
    Random,
}

/// How arrival at the garage wall is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Car rectangle tested against every garage rectangle each tick
    #[default]
    RectOverlap,
    /// Car leading edge compared against the wall, resolved by car lane
    Threshold,
}

/// Speed ramp: `base + (score / points_per_step) * speed_step`, capped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScaling {
    pub points_per_step: u32,
    /// Pixels per forward step added at each step
    pub speed_step: f32,
    /// Pixels per forward step
    pub max_speed: f32,
}

impl Default for DifficultyScaling {
    fn default() -> Self {
        Self {
            points_per_step: 5,
            speed_step: BASE_SPEED * 0.25,
            max_speed: BASE_SPEED * 3.0,
        }
    }
}

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("could not read tuning file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lane_count: u8,
    /// Height of one lane in pixels
    pub lane_height: f32,
    /// Distance from the car spawn edge to the far side of the garages
    pub field_width: f32,
    pub car_size: Vec2,
    pub garage_size: Vec2,
    /// Pixels advanced per forward step
    pub base_speed: f32,
    /// Car advances on every Nth tick
    pub move_interval_ticks: u32,
    /// Speed ramp with score (off when `None`)
    pub difficulty: Option<DifficultyScaling>,
    pub garage_policy: GaragePolicy,
    pub collision: CollisionPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            lane_height: SQUARE_SIZE,
            field_width: FIELD_WIDTH,
            car_size: Vec2::splat(SQUARE_SIZE),
            garage_size: Vec2::splat(SQUARE_SIZE),
            base_speed: BASE_SPEED,
            move_interval_ticks: 1,
            difficulty: None,
            garage_policy: GaragePolicy::PaletteOrder,
            collision: CollisionPolicy::RectOverlap,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject configurations the simulator cannot run
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if self.lane_count == 0 || self.lane_count > MAX_LANES {
            return invalid(format!(
                "lane_count must be in 1..={MAX_LANES}, got {}",
                self.lane_count
            ));
        }
        if !(self.lane_height > 0.0) || !(self.field_width > 0.0) {
            return invalid("lane_height and field_width must be positive".into());
        }
        if !(self.car_size.min_element() > 0.0) || !(self.garage_size.min_element() > 0.0) {
            return invalid("car_size and garage_size must be positive".into());
        }
        if self.car_size.y > self.lane_height || self.garage_size.y > self.lane_height {
            return invalid("car and garage must fit inside one lane".into());
        }
        if self.car_size.x + self.garage_size.x > self.field_width {
            return invalid("field too short for car and garage".into());
        }
        if self.move_interval_ticks == 0 {
            return invalid("move_interval_ticks must be at least 1".into());
        }
        // A faster car could step over a garage between two ticks
        let top_speed = self.difficulty.map_or(self.base_speed, |d| d.max_speed);
        if !(self.base_speed > 0.0) || top_speed > self.garage_size.x {
            return invalid(format!(
                "speed must be positive and at most the garage width ({})",
                self.garage_size.x
            ));
        }
        if let Some(d) = self.difficulty {
            if d.points_per_step == 0 || d.speed_step < 0.0 || d.max_speed < self.base_speed {
                return invalid("difficulty scaling must be non-decreasing".into());
            }
        }
        if usize::from(self.lane_count) > crate::sim::CarColor::ALL.len() {
            log::warn!(
                "{} lanes but only {} colors; garage colors will repeat",
                self.lane_count,
                crate::sim::CarColor::ALL.len()
            );
        }
        Ok(())
    }

    /// Total height of all lanes
    pub fn field_height(&self) -> f32 {
        self.lane_height * self.lane_count as f32
    }

    /// Left edge of the garage column
    pub fn wall_x(&self) -> f32 {
        self.field_width - self.garage_size.x
    }

    /// Top edge of a lane
    pub fn lane_top(&self, lane_index: usize) -> f32 {
        lane_index as f32 * self.lane_height
    }

    /// Car rectangle, centered vertically in its lane
    pub fn car_rect(&self, lane_index: usize, x: f32) -> Rect {
        let y = self.lane_top(lane_index) + (self.lane_height - self.car_size.y) / 2.0;
        Rect::new(x, y, self.car_size.x, self.car_size.y)
    }

    /// Garage rectangle, against the far wall and centered in its lane
    pub fn garage_rect(&self, lane_index: usize) -> Rect {
        let y = self.lane_top(lane_index) + (self.lane_height - self.garage_size.y) / 2.0;
        Rect::new(self.wall_x(), y, self.garage_size.x, self.garage_size.y)
    }

    /// Forward speed at a given score (monotonic non-decreasing)
    pub fn speed_for_score(&self, score: u32) -> f32 {
        match self.difficulty {
            None => self.base_speed,
            Some(d) => {
                let steps = (score / d.points_per_step) as f32;
                (self.base_speed + steps * d.speed_step).min(d.max_speed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.field_height(), 1000.0);
        assert_eq!(tuning.wall_x(), 1400.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "lane_count": 3, "collision": "Threshold" }"#)
            .expect("valid tuning");
        assert_eq!(tuning.lane_count, 3);
        assert_eq!(tuning.collision, CollisionPolicy::Threshold);
        assert_eq!(tuning.lane_height, SQUARE_SIZE);
        assert_eq!(tuning.garage_policy, GaragePolicy::PaletteOrder);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_lanes = Tuning {
            lane_count: 0,
            ..Default::default()
        };
        assert!(matches!(zero_lanes.validate(), Err(TuningError::Invalid(_))));

        let tall_car = Tuning {
            car_size: Vec2::new(200.0, 250.0),
            ..Default::default()
        };
        assert!(tall_car.validate().is_err());

        let tunneling = Tuning {
            base_speed: 500.0,
            ..Default::default()
        };
        assert!(tunneling.validate().is_err());

        let no_move = Tuning {
            move_interval_ticks: 0,
            ..Default::default()
        };
        assert!(no_move.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json_str("{ lane_count: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse { .. }));
    }

    #[test]
    fn test_speed_constant_without_scaling() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_score(0), BASE_SPEED);
        assert_eq!(tuning.speed_for_score(1000), BASE_SPEED);
    }

    #[test]
    fn test_speed_ramp_is_monotonic_and_capped() {
        let tuning = Tuning {
            difficulty: Some(DifficultyScaling::default()),
            ..Default::default()
        };
        let mut last = 0.0;
        for score in 0..200 {
            let speed = tuning.speed_for_score(score);
            assert!(speed >= last);
            assert!(speed <= BASE_SPEED * 3.0);
            last = speed;
        }
        assert_eq!(tuning.speed_for_score(4), BASE_SPEED);
        assert!(tuning.speed_for_score(5) > BASE_SPEED);
    }

    #[test]
    fn test_lane_geometry() {
        let tuning = Tuning {
            car_size: Vec2::new(200.0, 100.0),
            ..Default::default()
        };
        let car = tuning.car_rect(2, 0.0);
        assert_eq!(car.top(), 450.0);
        assert_eq!(car.bottom(), 550.0);

        let garage = tuning.garage_rect(4);
        assert_eq!(garage.top(), 800.0);
        assert_eq!(garage.left(), 1400.0);
    }
}
