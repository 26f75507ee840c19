//! Addition question generator.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::{fill_missing, MAX_SAMPLE_ATTEMPTS, OPTION_COUNT};
use crate::question::{Question, QuestionKind};

/// Largest addend for a difficulty level.
pub fn max_addend(level: u8) -> u32 {
    match level {
        0 | 1 => 5,
        2 => 10,
        3 => 15,
        _ => 20,
    }
}

/// Generate one addition question at the given level.
pub fn generate(level: u8, rng: &mut impl Rng) -> Question {
    let max = max_addend(level);
    let a = rng.gen_range(1..=max);
    let b = rng.gen_range(1..=max);
    let answer = a + b;

    let mut options = vec![answer];

    // Distractors close to the answer read as plausible to a child.
    let mut attempts = 0;
    while options.len() < OPTION_COUNT && attempts < MAX_SAMPLE_ATTEMPTS {
        attempts += 1;
        let offset = rng.gen_range(-3i64..=3);
        let wrong = answer as i64 + offset;
        if wrong > 0 && wrong != answer as i64 && !options.contains(&(wrong as u32)) {
            options.push(wrong as u32);
        }
    }

    // Near-range sampling exhausted: widen to uniform positives.
    attempts = 0;
    while options.len() < OPTION_COUNT && attempts < MAX_SAMPLE_ATTEMPTS {
        attempts += 1;
        let wrong = rng.gen_range(1..=answer * 2 + 10);
        if wrong != answer && !options.contains(&wrong) {
            options.push(wrong);
        }
    }
    fill_missing(&mut options);

    options.shuffle(rng);

    Question {
        id: Uuid::new_v4().to_string(),
        prompt: format!("{a} + {b}"),
        answer,
        options,
        level,
        kind: QuestionKind::Arithmetic,
    }
}

/// Generate a full round of addition questions.
pub fn generate_round(level: u8, size: usize, rng: &mut impl Rng) -> Vec<Question> {
    (0..size).map(|_| generate(level, rng)).collect()
}
