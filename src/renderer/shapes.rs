//! Draw list generation for 2D primitives

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{Rect, RoundPhase, RoundState};
use crate::tuning::Tuning;

pub type Rgba = [u8; 4];

pub const BACKGROUND: Rgba = [80, 80, 80, 255];
pub const LANE_MARK: Rgba = [245, 245, 245, 255];
pub const HUD_TEXT: Rgba = [245, 245, 245, 255];
pub const OVERLAY_TEXT: Rgba = [130, 130, 130, 255];
pub const LABEL_TEXT: Rgba = [0, 0, 0, 255];

/// Sprite drawn for the car, tinted with its color
pub const CAR_SPRITE: &str = "car_200px.png";

pub const HUD_FONT: f32 = 20.0;
pub const OVERLAY_FONT: f32 = 40.0;

/// One primitive for the host backend to draw, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: Rgba,
    },
    Sprite {
        name: &'static str,
        rect: Rect,
        tint: Rgba,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Rgba,
        /// `pos` is the center instead of the top-left
        centered: bool,
    },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub clear: Rgba,
    pub commands: Vec<DrawCmd>,
}

/// Dashed lines on every boundary between two lanes
pub fn lane_markers(tuning: &Tuning) -> Vec<DrawCmd> {
    let dash = Vec2::new(tuning.lane_height / 2.0, tuning.lane_height / 8.0);
    let dashes_per_line = (tuning.field_width / tuning.lane_height).ceil() as usize;

    (1..tuning.lane_count as usize)
        .flat_map(|lane| {
            let y = tuning.lane_top(lane) - dash.y / 2.0;
            (0..dashes_per_line).map(move |i| DrawCmd::Rect {
                rect: Rect::new(i as f32 * tuning.lane_height, y, dash.x, dash.y),
                color: LANE_MARK,
            })
        })
        .collect()
}

fn text(text: impl Into<String>, pos: Vec2, size: f32, color: Rgba, centered: bool) -> DrawCmd {
    DrawCmd::Text {
        text: text.into(),
        pos,
        size,
        color,
        centered,
    }
}

/// Build the draw list for a round
pub fn build_frame(state: &RoundState, settings: &Settings) -> Frame {
    let tuning = state.tuning();
    let screen_center = Vec2::new(tuning.field_width, tuning.field_height()) / 2.0;
    let mut commands = Vec::new();

    if state.phase() == RoundPhase::GameOver {
        commands.push(text(
            format!("GAME OVER - SCORE {}", state.score()),
            screen_center - Vec2::new(0.0, OVERLAY_FONT),
            OVERLAY_FONT,
            OVERLAY_TEXT,
            true,
        ));
        commands.push(text(
            "PRESS [ENTER] TO PLAY AGAIN",
            screen_center + Vec2::new(0.0, OVERLAY_FONT / 2.0),
            HUD_FONT,
            OVERLAY_TEXT,
            true,
        ));
        return Frame {
            clear: BACKGROUND,
            commands,
        };
    }

    commands.extend(lane_markers(tuning));

    for garage in state.garages() {
        commands.push(DrawCmd::Rect {
            rect: garage.rect,
            color: garage.color.rgba(),
        });
        if settings.high_contrast {
            commands.push(text(
                garage.color.as_str(),
                garage.rect.center(),
                HUD_FONT,
                LABEL_TEXT,
                true,
            ));
        }
    }

    let car = state.car();
    let car_rect = car.rect(tuning);
    commands.push(DrawCmd::Sprite {
        name: CAR_SPRITE,
        rect: car_rect,
        tint: car.color().rgba(),
    });
    if settings.high_contrast {
        commands.push(text(
            car.color().as_str(),
            car_rect.center(),
            HUD_FONT,
            LABEL_TEXT,
            true,
        ));
    }

    commands.push(text(
        format!("Score: {}", state.score()),
        Vec2::new(20.0, 20.0),
        HUD_FONT,
        HUD_TEXT,
        false,
    ));
    if settings.show_high_score {
        commands.push(text(
            format!("Best: {}", state.high_score()),
            Vec2::new(20.0, 20.0 + HUD_FONT * 1.25),
            HUD_FONT,
            HUD_TEXT,
            false,
        ));
    }

    if state.is_paused() {
        commands.push(text(
            "GAME PAUSED",
            screen_center,
            OVERLAY_FONT,
            OVERLAY_TEXT,
            true,
        ));
    }

    Frame {
        clear: BACKGROUND,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn texts(frame: &Frame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_lane_markers() {
        let markers = lane_markers(&Tuning::default());
        // 4 inner boundaries, 8 dashes across 1600 px
        assert_eq!(markers.len(), 32);
        let DrawCmd::Rect { rect, .. } = &markers[0] else {
            panic!("marker should be a rect");
        };
        assert_eq!(rect.size, Vec2::new(100.0, 25.0));
        assert_eq!(rect.center().y, 200.0);
    }

    #[test]
    fn test_playing_frame() {
        let state = RoundState::new(Tuning::default(), 5, 3).unwrap();
        let frame = build_frame(&state, &Settings::default());

        let garage_colors: Vec<Rgba> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Rect { rect, color } if rect.size == Vec2::splat(200.0) => Some(*color),
                _ => None,
            })
            .collect();
        let expected: Vec<Rgba> = state.garages().iter().map(|g| g.color.rgba()).collect();
        assert_eq!(garage_colors, expected);

        assert!(frame.commands.contains(&DrawCmd::Sprite {
            name: CAR_SPRITE,
            rect: state.car().rect(state.tuning()),
            tint: state.car().color().rgba(),
        }));
        assert_eq!(texts(&frame), vec!["Score: 0", "Best: 3"]);
    }

    #[test]
    fn test_high_contrast_labels() {
        let state = RoundState::new(Tuning::default(), 5, 0).unwrap();
        let settings = Settings {
            high_contrast: true,
            show_high_score: false,
            ..Default::default()
        };
        let frame = build_frame(&state, &settings);
        let labels = texts(&frame);
        assert!(labels.contains(&"Purple"));
        assert!(labels.contains(&state.car().color().as_str()));
    }

    #[test]
    fn test_paused_overlay() {
        let mut state = RoundState::new(Tuning::default(), 5, 0).unwrap();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        let frame = build_frame(&state, &Settings::default());
        assert!(texts(&frame).contains(&"GAME PAUSED"));
    }

    #[test]
    fn test_game_over_frame_only_has_overlay() {
        let mut state = RoundState::new(Tuning::default(), 5, 0).unwrap();
        // Steer away from the matching garage until the round ends
        for _ in 0..2000 {
            if state.is_game_over() {
                break;
            }
            let target = state
                .garages()
                .iter()
                .find(|g| g.color != state.car().color())
                .map(|g| g.lane.index())
                .unwrap_or(0);
            let lane = state.car().lane().index();
            let input = TickInput {
                move_up: target < lane,
                move_down: target > lane,
                ..Default::default()
            };
            tick(&mut state, &input);
        }
        assert!(state.is_game_over());

        let frame = build_frame(&state, &Settings::default());
        assert_eq!(frame.commands.len(), 2);
        assert!(texts(&frame).contains(&"PRESS [ENTER] TO PLAY AGAIN"));
    }
}
