//! Round reducer and engine.
//!
//! `reduce` is the pure transition function `(state, action) -> state'`;
//! every action is total, invalid inputs return the prior state unchanged.
//! `RoundEngine` wraps it with an owned seedable RNG, event emission, and
//! a session counter that invalidates deferred transitions from a
//! superseded round.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use crate::events::GameEvent;
use crate::mode::GameMode;
use crate::scoring::calculate_score;

use super::{Answer, GameAction, RoundState, RoundSummary};

/// Apply one action to the round state.
pub fn reduce(
    state: &RoundState,
    action: &GameAction,
    mode: GameMode,
    rng: &mut impl Rng,
) -> RoundState {
    match action {
        GameAction::InitRound { level } => {
            // Round number only advances when the prior round actually
            // finished; an abandoned round is replayed under its number.
            let round_number = if state.round_complete {
                state.round_number + 1
            } else {
                state.round_number
            };
            let total_score = state.total_score + state.score;
            let mut next =
                RoundState::with_progress(mode, *level, round_number, total_score, rng);
            next.best_streak = state.best_streak;
            next
        }

        GameAction::SelectAnswer { value } => {
            let Some(question) = state.current_question() else {
                return state.clone();
            };
            if state.hearts == 0 || state.round_complete {
                return state.clone();
            }
            if mode.absorbs_repeated_wrong() && state.wrong_answers.contains(value) {
                return state.clone();
            }

            let correct = question.is_correct(*value);
            let fact = question.fact_key();
            let breakdown = calculate_score(correct, mode.scoring_streak(state.streak), 0.0);

            let mut next = state.clone();
            next.answer = Answer::Evaluated {
                selected: *value,
                correct,
            };
            next.score += breakdown.total;
            next.streak = if correct { state.streak + 1 } else { 0 };
            next.best_streak = next.best_streak.max(next.streak);
            next.answered_count += 1;
            next.show_confetti = correct;

            if correct {
                next.correct_count += 1;
            } else {
                next.hearts = next.hearts.saturating_sub(1);
                *next.missed_facts.entry(fact).or_insert(0) += 1;
                next.wrong_answers.insert(*value);
            }

            let is_last = state.current_index >= state.questions.len().saturating_sub(1);
            next.round_complete = is_last || next.hearts == 0;
            next
        }

        GameAction::NextQuestion => {
            if state.round_complete {
                let mut next = state.clone();
                next.show_summary = true;
                return next;
            }
            let next_index = state.current_index + 1;
            if next_index >= state.questions.len() {
                let mut next = state.clone();
                next.show_summary = true;
                next.round_complete = true;
                return next;
            }
            let mut next = state.clone();
            next.current_index = next_index;
            next.answer = Answer::Unanswered;
            next.show_confetti = false;
            next.wrong_answers.clear();
            next
        }

        GameAction::PrevQuestion => {
            if state.current_index == 0 {
                return state.clone();
            }
            let mut next = state.clone();
            next.current_index -= 1;
            next.answer = Answer::Unanswered;
            next.show_confetti = false;
            next
        }

        GameAction::ResetRound => RoundState::new(mode, state.level, rng),

        GameAction::ShowSummary => {
            let mut next = state.clone();
            next.show_summary = true;
            next
        }

        GameAction::HideSummary => {
            let mut next = state.clone();
            next.show_summary = false;
            next
        }
    }
}

/// Owns the round state, the RNG, and the session identity.
///
/// All transitions execute synchronously to completion. Timed auto-advance
/// lives in the caller: schedule `apply_scheduled(session(), action)` and a
/// round started in the meantime makes the stale call a no-op.
#[derive(Debug)]
pub struct RoundEngine {
    mode: GameMode,
    state: RoundState,
    rng: Mcg128Xsl64,
    session: u64,
    round_started_at: DateTime<Utc>,
}

impl RoundEngine {
    /// Create an engine with a fresh round 1 and no prior progress.
    /// `seed` makes question generation fully deterministic for replay.
    pub fn new(mode: GameMode, level: u8, seed: Option<u64>) -> Self {
        Self::with_progress(mode, level, 0, 0, seed)
    }

    /// Resume a session from durable progress: the cumulative score and
    /// best streak carry over, the round counter restarts at 1. Durable
    /// state flows into the engine only here, at session start.
    pub fn with_progress(
        mode: GameMode,
        level: u8,
        total_score: u32,
        best_streak: u32,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let mut state = RoundState::with_progress(mode, level, 1, total_score, &mut rng);
        state.best_streak = best_streak;
        Self {
            mode,
            state,
            rng,
            session: 0,
            round_started_at: Utc::now(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Identity of the current round session. Bumped by `InitRound` and
    /// `ResetRound`; deferred actions carry it to stay cancellable.
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary::from_state(&self.state, self.mode, self.round_started_at)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply an action. Returns an event when the state observably changed.
    pub fn apply(&mut self, action: GameAction) -> Option<GameEvent> {
        let was_complete = self.state.round_complete;
        let was_summary = self.state.show_summary;
        let prev_index = self.state.current_index;
        let prev_score = self.state.score;

        let next = reduce(&self.state, &action, self.mode, &mut self.rng);
        let changed = next != self.state;
        self.state = next;
        if !changed {
            return None;
        }

        match action {
            GameAction::InitRound { .. } | GameAction::ResetRound => {
                self.session += 1;
                self.round_started_at = Utc::now();
                Some(GameEvent::RoundStarted {
                    round_number: self.state.round_number,
                    level: self.state.level,
                    question_count: self.state.questions.len(),
                    at: Utc::now(),
                })
            }
            GameAction::SelectAnswer { value } => {
                if !was_complete && self.state.round_complete {
                    return Some(GameEvent::RoundCompleted {
                        round_number: self.state.round_number,
                        hearts: self.state.hearts,
                        score: self.state.score,
                        at: Utc::now(),
                    });
                }
                Some(GameEvent::AnswerEvaluated {
                    question_index: self.state.current_index,
                    selected: value,
                    correct: self.state.answer.is_correct().unwrap_or(false),
                    streak: self.state.streak,
                    score_delta: self.state.score - prev_score,
                    hearts: self.state.hearts,
                    at: Utc::now(),
                })
            }
            GameAction::NextQuestion | GameAction::PrevQuestion => {
                if !was_summary && self.state.show_summary {
                    Some(GameEvent::SummaryShown {
                        summary: self.summary(),
                        at: Utc::now(),
                    })
                } else if self.state.current_index != prev_index {
                    Some(GameEvent::QuestionAdvanced {
                        question_index: self.state.current_index,
                        at: Utc::now(),
                    })
                } else {
                    None
                }
            }
            GameAction::ShowSummary => Some(GameEvent::SummaryShown {
                summary: self.summary(),
                at: Utc::now(),
            }),
            GameAction::HideSummary => None,
        }
    }

    /// Apply a deferred action scheduled while `session` was current.
    /// Stale sessions are dropped so a timer from a finished round can
    /// never advance its successor.
    pub fn apply_scheduled(&mut self, session: u64, action: GameAction) -> Option<GameEvent> {
        if session != self.session {
            return None;
        }
        self.apply(action)
    }

    /// Record the milestone whose reward flow is in progress. Emits
    /// `MilestoneReached` when one is set.
    pub fn set_pending_milestone(&mut self, milestone_id: Option<String>) -> Option<GameEvent> {
        self.state.pending_milestone = milestone_id.clone();
        milestone_id.map(|id| GameEvent::MilestoneReached {
            milestone_id: id,
            at: Utc::now(),
        })
    }
}
