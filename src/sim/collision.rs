//! Arrival detection between the car and the garage column
//!
//! Two policies are supported (see [`CollisionPolicy`]). Both report which
//! garage the car arrived at; deciding match or mismatch is the tick's job.

use super::rect::Rect;
use super::state::{Car, Garage, Lane};
use crate::tuning::{CollisionPolicy, Tuning};

/// First garage (in lane order) whose rectangle overlaps the car
pub fn car_garage_overlap<'a>(car_rect: &Rect, garages: &'a [Garage]) -> Option<&'a Garage> {
    garages.iter().find(|g| car_rect.overlaps(&g.rect))
}

/// True once the car's leading edge has reached the garage wall
#[inline]
pub fn reached_wall(car_rect: &Rect, wall_x: f32) -> bool {
    car_rect.right() >= wall_x
}

/// Lane of the garage the car has arrived at this tick, if any
pub fn arrival(car: &Car, garages: &[Garage], tuning: &Tuning) -> Option<Lane> {
    let car_rect = car.rect(tuning);
    match tuning.collision {
        CollisionPolicy::RectOverlap => car_garage_overlap(&car_rect, garages).map(|g| g.lane),
        CollisionPolicy::Threshold => reached_wall(&car_rect, tuning.wall_x()).then_some(car.lane()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CarColor, RoundState};

    fn state_with(collision: CollisionPolicy) -> RoundState {
        let tuning = Tuning {
            collision,
            ..Default::default()
        };
        RoundState::new(tuning, 11, 0).unwrap()
    }

    fn car_at(lane: usize, x: f32) -> Car {
        let mut car = Car::new(Lane::new(lane, 5).unwrap(), CarColor::Green);
        car.step_forward(x, 5);
        car
    }

    #[test]
    fn test_no_arrival_at_start() {
        let state = state_with(CollisionPolicy::RectOverlap);
        assert_eq!(arrival(&car_at(3, 0.0), state.garages(), state.tuning()), None);
    }

    #[test]
    fn test_overlap_hits_own_lane_only() {
        let state = state_with(CollisionPolicy::RectOverlap);
        // Car right edge at 1200 touches nothing
        assert_eq!(arrival(&car_at(3, 1000.0), state.garages(), state.tuning()), None);
        // Car right edge exactly on the wall: shared edge, not an overlap
        assert_eq!(arrival(&car_at(3, 1200.0), state.garages(), state.tuning()), None);
        // One pixel into the garage
        let lane = arrival(&car_at(3, 1201.0), state.garages(), state.tuning());
        assert_eq!(lane.map(|l| l.index()), Some(3));
    }

    #[test]
    fn test_threshold_fires_on_wall() {
        let state = state_with(CollisionPolicy::Threshold);
        assert_eq!(arrival(&car_at(1, 1199.0), state.garages(), state.tuning()), None);
        let lane = arrival(&car_at(1, 1200.0), state.garages(), state.tuning());
        assert_eq!(lane.map(|l| l.index()), Some(1));
    }

    #[test]
    fn test_overlap_scans_all_garages() {
        let state = state_with(CollisionPolicy::RectOverlap);
        // A rect spanning two lanes reports the first one in lane order
        let tall = Rect::new(1300.0, 150.0, 200.0, 200.0);
        let hit = car_garage_overlap(&tall, state.garages()).map(|g| g.lane.index());
        assert_eq!(hit, Some(0));
    }
}
