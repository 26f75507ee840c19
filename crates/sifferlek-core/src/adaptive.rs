//! Adaptive difficulty tracking.
//!
//! Tracks consecutive results and a short sliding window of outcomes to
//! step the difficulty level up or down. The tracker's own `level` moves
//! on hard rules (5 in a row up, 2 misses down); `recommended_level` is a
//! softer advisory signal for UI hinting and does not mutate the tracker.

use serde::{Deserialize, Serialize};

/// Lowest difficulty level.
pub const MIN_LEVEL: u8 = 1;
/// Highest difficulty level.
pub const MAX_LEVEL: u8 = 4;

/// Outcomes kept in the sliding accuracy window.
const WINDOW: usize = 5;
/// Consecutive correct answers required to step up a level.
const STEP_UP_AFTER: u32 = 5;
/// Consecutive wrong answers required to step down a level.
const STEP_DOWN_AFTER: u32 = 2;

/// Per-session ability tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityTracker {
    level: u8,
    consecutive_correct: u32,
    consecutive_wrong: u32,
    /// Last `WINDOW` answer outcomes, oldest first.
    recent: Vec<bool>,
    /// Fraction correct over `recent`. 1.0 before any answers.
    recent_accuracy: f64,
}

impl AbilityTracker {
    pub fn new(initial_level: u8) -> Self {
        Self {
            level: initial_level.clamp(MIN_LEVEL, MAX_LEVEL),
            consecutive_correct: 0,
            consecutive_wrong: 0,
            recent: Vec::new(),
            recent_accuracy: 1.0,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn consecutive_wrong(&self) -> u32 {
        self.consecutive_wrong
    }

    pub fn recent_accuracy(&self) -> f64 {
        self.recent_accuracy
    }

    /// Record one answer outcome.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.consecutive_correct += 1;
            self.consecutive_wrong = 0;
            if self.consecutive_correct >= STEP_UP_AFTER && self.level < MAX_LEVEL {
                self.level += 1;
                self.consecutive_correct = 0;
            }
        } else {
            self.consecutive_wrong += 1;
            self.consecutive_correct = 0;
            if self.consecutive_wrong >= STEP_DOWN_AFTER && self.level > MIN_LEVEL {
                self.level -= 1;
                self.consecutive_wrong = 0;
            }
        }

        self.recent.push(correct);
        if self.recent.len() > WINDOW {
            self.recent.remove(0);
        }
        let hits = self.recent.iter().filter(|&&a| a).count();
        self.recent_accuracy = hits as f64 / self.recent.len() as f64;
    }

    /// Advisory level recommendation based on the recent window.
    ///
    /// Separate from the tracker's own level stepping; clamped to
    /// `[MIN_LEVEL, MAX_LEVEL]`.
    pub fn recommended_level(&self) -> u8 {
        if self.recent_accuracy >= 0.8 && self.consecutive_correct >= 3 {
            (self.level + 1).min(MAX_LEVEL)
        } else if self.recent_accuracy < 0.4 || self.consecutive_wrong >= STEP_DOWN_AFTER {
            self.level.saturating_sub(1).max(MIN_LEVEL)
        } else {
            self.level
        }
    }
}

impl Default for AbilityTracker {
    fn default() -> Self {
        Self::new(MIN_LEVEL)
    }
}
