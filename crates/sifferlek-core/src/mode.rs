//! Game mode policy.
//!
//! The arithmetic and counting games share one round engine; everything
//! that differs between them lives here as data on `GameMode`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::generator::{arithmetic, counting};
use crate::question::Question;
use crate::scoring;

/// Which game is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Addition practice ("Plus").
    Arithmetic,
    /// Object counting ("Räkna"): slower pace, no streak bonuses,
    /// repeated wrong answers on a question are absorbed.
    Counting,
}

impl GameMode {
    /// Generate the question sequence for a round.
    pub fn generate_round(
        &self,
        level: u8,
        size: usize,
        round_number: u32,
        total_score: u32,
        rng: &mut impl Rng,
    ) -> Vec<Question> {
        match self {
            GameMode::Arithmetic => arithmetic::generate_round(level, size, rng),
            GameMode::Counting => {
                counting::generate_round(level, size, round_number, total_score, rng)
            }
        }
    }

    /// The streak value handed to the scoring engine.
    ///
    /// Counting still tracks streaks for stats but does not pay bonuses
    /// for them.
    pub fn scoring_streak(&self, streak: u32) -> u32 {
        match self {
            GameMode::Arithmetic => streak,
            GameMode::Counting => 0,
        }
    }

    /// Whether re-selecting an answer already marked wrong on the current
    /// question is ignored instead of costing another heart.
    pub fn absorbs_repeated_wrong(&self) -> bool {
        matches!(self, GameMode::Counting)
    }

    /// Star rating for a finished round.
    pub fn stars(&self, correct: u32, total: u32, best_streak: u32) -> u8 {
        match self {
            GameMode::Arithmetic => scoring::stars_arithmetic(correct, total, best_streak),
            GameMode::Counting => scoring::stars_counting(correct, total),
        }
    }

    /// Cumulative-score milestone thresholds, ascending, paired with the
    /// milestone id each one unlocks. Counting progresses at half speed,
    /// so its thresholds are doubled onto the same milestone ids.
    pub fn score_milestones(&self) -> [(u32, &'static str); 3] {
        match self {
            GameMode::Arithmetic => [(100, "100_points"), (200, "200_points"), (300, "300_points")],
            GameMode::Counting => [(200, "100_points"), (400, "200_points"), (600, "300_points")],
        }
    }
}
