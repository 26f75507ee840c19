use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::round::RoundSummary;

/// Every observable state change in a game session produces an Event.
/// The presentation layer polls these to drive rendering and timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    RoundStarted {
        round_number: u32,
        level: u8,
        question_count: usize,
        at: DateTime<Utc>,
    },
    AnswerEvaluated {
        question_index: usize,
        selected: u32,
        correct: bool,
        streak: u32,
        score_delta: u32,
        hearts: u8,
        at: DateTime<Utc>,
    },
    QuestionAdvanced {
        question_index: usize,
        at: DateTime<Utc>,
    },
    RoundCompleted {
        round_number: u32,
        hearts: u8,
        score: u32,
        at: DateTime<Utc>,
    },
    SummaryShown {
        summary: RoundSummary,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        milestone_id: String,
        at: DateTime<Utc>,
    },
}
