//! Object-counting question generator.
//!
//! Counting questions show a field of identical objects and ask "Hur många?".
//! Target counts follow a level-dependent weighted distribution, with an
//! anti-repetition rule so the same count never appears twice within a
//! three-question window.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::{fill_missing, MAX_SAMPLE_ATTEMPTS, OPTION_COUNT};
use crate::question::{Question, QuestionKind, COUNTING_THEMES};

/// Counts the anti-repetition rule looks back over.
pub const RECENT_WINDOW: usize = 3;

/// Bounded resample attempts for the anti-repetition rule.
const MAX_REPEAT_ATTEMPTS: u32 = 15;

/// Preferred distractor offsets, tried in order before uniform sampling.
const DISTRACTOR_OFFSETS: [i64; 8] = [-2, -1, 1, 2, 3, -3, 4, -4];

/// Largest target count for a difficulty level.
pub fn max_count(level: u8) -> u32 {
    match level {
        0 | 1 => 10,
        2 => 15,
        _ => 20,
    }
}

/// Sample a target count from the level's weighted distribution.
///
/// A count of 1 is a tutorial-only affordance: 1% probability, and only in
/// the very first round while the cumulative score is still under 10.
fn weighted_count(level: u8, round_number: u32, total_score: u32, rng: &mut impl Rng) -> u32 {
    if rng.gen::<f64>() < 0.01 && total_score < 10 && round_number == 1 {
        return 1;
    }

    let band = rng.gen::<f64>();
    if level <= 1 {
        // Early: mostly 2-5.
        if band < 0.70 {
            rng.gen_range(2..=5)
        } else if band < 0.90 {
            rng.gen_range(6..=8)
        } else {
            rng.gen_range(9..=10)
        }
    } else if level == 2 {
        // Mid: mostly 5-12.
        if band < 0.75 {
            rng.gen_range(5..=12)
        } else if band < 0.90 {
            rng.gen_range(2..=5)
        } else {
            rng.gen_range(13..=15)
        }
    } else {
        // Later: mostly 8-20.
        if band < 0.75 {
            rng.gen_range(8..=20)
        } else if band < 0.90 {
            rng.gen_range(4..=7)
        } else {
            rng.gen_range(2..=4)
        }
    }
}

/// Generate one counting question.
///
/// `recent` holds the target counts of the last few counting questions;
/// counts present there are resampled (bounded) to avoid repetition.
pub fn generate(
    level: u8,
    round_number: u32,
    total_score: u32,
    recent: &[u32],
    rng: &mut impl Rng,
) -> Question {
    let max = max_count(level);

    let mut answer = weighted_count(level, round_number, total_score, rng);
    let mut attempts = 0;
    while recent.contains(&answer) && attempts < MAX_REPEAT_ATTEMPTS {
        answer = weighted_count(level, round_number, total_score, rng);
        attempts += 1;
    }
    answer = answer.clamp(1, max);

    let theme = COUNTING_THEMES
        .choose(rng)
        .copied()
        .unwrap_or(COUNTING_THEMES[0]);

    let mut options = vec![answer];

    // Close distractors first, clipped to the level's count range.
    for offset in DISTRACTOR_OFFSETS {
        if options.len() >= OPTION_COUNT {
            break;
        }
        let wrong = answer as i64 + offset;
        if wrong >= 1 && wrong <= max as i64 && !options.contains(&(wrong as u32)) {
            options.push(wrong as u32);
        }
    }

    let mut attempts = 0;
    while options.len() < OPTION_COUNT && attempts < MAX_SAMPLE_ATTEMPTS {
        attempts += 1;
        let wrong = rng.gen_range(1..=max);
        if !options.contains(&wrong) {
            options.push(wrong);
        }
    }
    fill_missing(&mut options);

    options.shuffle(rng);

    Question {
        id: Uuid::new_v4().to_string(),
        prompt: format!("Hur många {}?|{}|{}", theme.name, theme.emoji, answer),
        answer,
        options,
        level,
        kind: QuestionKind::Counting,
    }
}

/// Generate a full round of counting questions, threading the
/// anti-repetition window across the round.
pub fn generate_round(
    level: u8,
    size: usize,
    round_number: u32,
    total_score: u32,
    rng: &mut impl Rng,
) -> Vec<Question> {
    let mut questions = Vec::with_capacity(size);
    let mut recent: Vec<u32> = Vec::new();

    for _ in 0..size {
        let q = generate(level, round_number, total_score, &recent, rng);
        recent.push(q.answer);
        if recent.len() > RECENT_WINDOW {
            recent.remove(0);
        }
        questions.push(q);
    }

    questions
}
