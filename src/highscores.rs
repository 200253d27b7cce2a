//! High score leaderboard system
//!
//! Persisted in the per-user data directory, tracks top 10 scores. The top
//! entry seeds the in-memory high score of a new session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};
use crate::sim::{GameEvent, RoundState};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Cars parked before the wrong garage
    pub score: u32,
    /// Seed of the session that produced it
    pub seed: u64,
    /// Unix seconds when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const FILE_NAME: &'static str = "highscores.json";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, seed: u64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            seed,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Enter the score of a round that just ended in a mismatch
    pub fn record_event(&mut self, event: &GameEvent, seed: u64, timestamp: u64) -> Option<usize> {
        let GameEvent::Mismatch { score, .. } = *event else {
            return None;
        };
        let rank = self.add_score(score, seed, timestamp);
        if let Some(rank) = rank {
            log::info!("Score {} entered the leaderboard at #{}", score, rank);
        }
        rank
    }

    /// Enter the score of a round still in play when the session ends.
    /// A round already over was entered by [`Self::record_event`].
    pub fn record_unfinished(&mut self, state: &RoundState, timestamp: u64) -> Option<usize> {
        if state.is_game_over() {
            return None;
        }
        let rank = self.add_score(state.score(), state.seed(), timestamp);
        if let Some(rank) = rank {
            log::info!(
                "Unfinished round scored {}, leaderboard #{}",
                state.score(),
                rank
            );
        }
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score, 0 when empty
    pub fn top_score(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Default save location
    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        Ok(persistence::data_dir()?.join(Self::FILE_NAME))
    }

    /// Load from `path`, starting fresh if missing or unreadable
    pub fn load(path: &Path) -> Self {
        match persistence::load::<HighScores>(path) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(err) => {
                log::warn!("Could not load high scores ({}), starting fresh", err);
                Self::new()
            }
        }
    }

    /// Save to `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.top_score(), 0);
    }

    #[test]
    fn test_entries_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(3, 1, 100), Some(1));
        assert_eq!(scores.add_score(8, 2, 200), Some(1));
        assert_eq!(scores.add_score(5, 3, 300), Some(2));
        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![8, 5, 3]);
        assert_eq!(scores.top_score(), 8);
    }

    #[test]
    fn test_full_board_keeps_best_ten() {
        let mut scores = HighScores::new();
        for score in 1..=MAX_HIGH_SCORES as u32 {
            scores.add_score(score, 0, 0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(1));
        assert_eq!(scores.add_score(1, 0, 0), None);

        assert_eq!(scores.add_score(20, 0, 0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(2));
    }

    fn play(state: &mut RoundState, scores: &mut HighScores, ticks: u32, input: &TickInput) {
        for _ in 0..ticks {
            for event in tick(state, input) {
                scores.record_event(&event, state.seed(), 0);
            }
        }
    }

    #[test]
    fn test_unfinished_round_is_recorded() {
        let mut state = RoundState::new(Tuning::default(), 42, 0).unwrap();
        let mut scores = HighScores::new();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        play(&mut state, &mut scores, 3600, &idle);
        // The autopilot never picks the wrong garage, so no round ended
        assert!(scores.is_empty());
        assert!(state.score() > 0);

        assert_eq!(scores.record_unfinished(&state, 0), Some(1));
        assert_eq!(scores.top_score(), state.score());
        assert_eq!(scores.entries[0].seed, 42);

        // The next session starts from the saved best
        let next = RoundState::new(Tuning::default(), 43, scores.top_score()).unwrap();
        assert_eq!(next.high_score(), state.score());
    }

    #[test]
    fn test_finished_round_is_recorded_once() {
        let mut state = RoundState::new(Tuning::default(), 7, 0).unwrap();
        state.record_match();
        state.record_match();
        let mut scores = HighScores::new();

        // Steer into a garage of another color
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
            play(&mut state, &mut scores, 1, &input);
        }
        assert!(state.is_game_over());

        assert_eq!(scores.top_score(), 2);
        assert_eq!(scores.record_unfinished(&state, 0), None);
        assert_eq!(scores.entries.len(), 1);
    }

    #[test]
    fn test_ignores_other_events() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record_event(&GameEvent::NewHighScore { score: 4 }, 1, 0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("color-garage-highscores-{}", std::process::id()))
            .join(HighScores::FILE_NAME);
        let mut scores = HighScores::new();
        scores.add_score(4, 77, 1_700_000_000);
        scores.save(&path).unwrap();

        assert_eq!(HighScores::load(&path), scores);
    }

    #[test]
    fn test_load_missing_starts_fresh() {
        let path = std::env::temp_dir().join("color-garage-no-such-dir/highscores.json");
        assert!(HighScores::load(&path).is_empty());
    }
}
