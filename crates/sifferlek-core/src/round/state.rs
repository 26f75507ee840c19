use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mode::GameMode;
use crate::question::Question;

/// Questions per round.
pub const ROUND_SIZE: usize = 10;
/// Hearts at the start of a round.
pub const MAX_HEARTS: u8 = 3;

/// Answer status of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Answer {
    Unanswered,
    Evaluated { selected: u32, correct: bool },
}

impl Answer {
    pub fn selected(&self) -> Option<u32> {
        match self {
            Answer::Unanswered => None,
            Answer::Evaluated { selected, .. } => Some(*selected),
        }
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self {
            Answer::Unanswered => None,
            Answer::Evaluated { correct, .. } => Some(*correct),
        }
    }
}

/// Every input the round engine responds to.
///
/// The set is closed: the reducer matches exhaustively, so adding a
/// variant without handling it is a compile error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// Fold the current round into the totals and start a fresh one.
    InitRound { level: u8 },
    /// Evaluate an answer for the current question.
    SelectAnswer { value: u32 },
    /// Advance to the next question, or to the summary once complete.
    NextQuestion,
    /// Step back one question without un-scoring.
    PrevQuestion,
    /// Discard everything and start over at the current level.
    ResetRound,
    ShowSummary,
    HideSummary,
}

/// Complete state of one game session's active round.
///
/// Replaced wholesale by every transition; a single writer owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Ordered question sequence for this round.
    pub questions: Vec<Question>,
    /// Index of the question being shown.
    pub current_index: usize,
    /// Selection state of the current question.
    pub answer: Answer,

    /// Monotonic round counter, starting at 1.
    pub round_number: u32,
    pub round_complete: bool,

    /// Score earned this round.
    pub score: u32,
    /// Cumulative score from previous rounds (this round's score is folded
    /// in by `InitRound`).
    pub total_score: u32,
    pub streak: u32,
    pub best_streak: u32,
    /// Remaining hearts, 0-3. Reaching 0 ends the round early.
    pub hearts: u8,
    pub level: u8,

    pub correct_count: u32,
    pub answered_count: u32,
    /// Fact key -> times missed, this session.
    pub missed_facts: HashMap<String, u32>,
    /// Values already marked wrong on the current question.
    pub wrong_answers: HashSet<u32>,

    // UI-facing flags.
    pub show_summary: bool,
    pub show_confetti: bool,
    pub pending_milestone: Option<String>,
}

impl RoundState {
    /// Fresh round 1 at the given level.
    pub fn new(mode: GameMode, level: u8, rng: &mut impl Rng) -> Self {
        Self::with_progress(mode, level, 1, 0, rng)
    }

    /// Fresh round with carried-over round number and cumulative score.
    pub fn with_progress(
        mode: GameMode,
        level: u8,
        round_number: u32,
        total_score: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let questions = mode.generate_round(level, ROUND_SIZE, round_number, total_score, rng);
        Self {
            questions,
            current_index: 0,
            answer: Answer::Unanswered,
            round_number,
            round_complete: false,
            score: 0,
            total_score,
            streak: 0,
            best_streak: 0,
            hearts: MAX_HEARTS,
            level,
            correct_count: 0,
            answered_count: 0,
            missed_facts: HashMap::new(),
            wrong_answers: HashSet::new(),
            show_summary: false,
            show_confetti: false,
            pending_milestone: None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Cumulative score including the round in progress.
    pub fn effective_total_score(&self) -> u32 {
        self.total_score + self.score
    }

    /// Fraction of answered questions that were correct.
    pub fn accuracy(&self) -> f64 {
        if self.answered_count == 0 {
            0.0
        } else {
            self.correct_count as f64 / self.answered_count as f64
        }
    }
}
