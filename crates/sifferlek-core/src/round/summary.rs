use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::GameMode;

use super::RoundState;

/// End-of-round results handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub accuracy: f64,
    pub best_streak: u32,
    /// Wall-clock seconds spent in the round.
    pub elapsed_secs: u64,
    /// 0-3 stars, thresholds depend on the mode.
    pub stars: u8,
    pub score_earned: u32,
}

impl RoundSummary {
    pub fn from_state(state: &RoundState, mode: GameMode, started_at: DateTime<Utc>) -> Self {
        let elapsed = (Utc::now() - started_at).num_seconds().max(0) as u64;
        Self {
            round_number: state.round_number,
            correct_answers: state.correct_count,
            total_questions: state.answered_count,
            accuracy: state.accuracy(),
            best_streak: state.best_streak,
            elapsed_secs: elapsed,
            stars: mode.stars(state.correct_count, state.answered_count, state.best_streak),
            score_earned: state.score,
        }
    }
}
