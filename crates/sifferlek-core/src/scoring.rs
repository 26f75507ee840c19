//! Streak-and-multiplier scoring.
//!
//! Pure functions: correctness and the streak *before* the answer map to a
//! points breakdown. The breakdown keeps its parts separate so the UI can
//! explain where points came from.

use serde::{Deserialize, Serialize};

/// Base points for a correct answer.
const BASE_POINTS: u32 = 10;
/// Streak multiplier cap.
const MAX_MULTIPLIER: f64 = 3.0;
/// Streak bonus cap.
const MAX_STREAK_BONUS: u32 = 20;

/// Breakdown of points earned by one answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Base points after the streak multiplier.
    pub points: u32,
    /// Flat bonus for maintaining a streak.
    pub streak_bonus: u32,
    /// Multiplier that was applied (1.0 when incorrect).
    pub multiplier: f64,
    /// Total points awarded for this answer.
    pub total: u32,
}

impl ScoreBreakdown {
    /// The breakdown for an incorrect answer: nothing awarded.
    pub fn none() -> Self {
        Self {
            points: 0,
            streak_bonus: 0,
            multiplier: 1.0,
            total: 0,
        }
    }
}

/// Score one answer.
///
/// `streak` is the number of consecutive correct answers *before* this one.
/// `speed_bonus` is a 0.0-1.0 fraction of base points for answering fast;
/// the round flow passes 0.0 and leaves speed scoring to future callers.
pub fn calculate_score(correct: bool, streak: u32, speed_bonus: f64) -> ScoreBreakdown {
    if !correct {
        return ScoreBreakdown::none();
    }

    // Multiplier steps up every 3 correct answers: 1x, 1.5x, 2x, ...
    let multiplier = (1.0 + (streak / 3) as f64 * 0.5).min(MAX_MULTIPLIER);
    let streak_bonus = (streak * 2).min(MAX_STREAK_BONUS);
    let speed_points = (BASE_POINTS as f64 * speed_bonus.clamp(0.0, 1.0)).floor() as u32;

    let points = (BASE_POINTS as f64 * multiplier).floor() as u32;
    ScoreBreakdown {
        points,
        streak_bonus,
        multiplier,
        total: points + streak_bonus + speed_points,
    }
}

/// Star rating for an arithmetic round (0-3).
pub fn stars_arithmetic(correct: u32, total: u32, best_streak: u32) -> u8 {
    let accuracy = accuracy(correct, total);
    if accuracy >= 0.9 && best_streak >= 5 {
        3
    } else if accuracy >= 0.7 || best_streak >= 3 {
        2
    } else if accuracy >= 0.5 {
        1
    } else {
        0
    }
}

/// Star rating for a counting round (0-3). More lenient: counting is slower
/// paced and streaks carry less weight.
pub fn stars_counting(correct: u32, total: u32) -> u8 {
    let accuracy = accuracy(correct, total);
    if accuracy >= 0.8 && correct >= 8 {
        3
    } else if accuracy >= 0.6 || correct >= 6 {
        2
    } else if accuracy >= 0.4 {
        1
    } else {
        0
    }
}

fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn incorrect_awards_nothing() {
        for streak in [0, 1, 5, 30] {
            let b = calculate_score(false, streak, 0.0);
            assert_eq!(b.points, 0);
            assert_eq!(b.streak_bonus, 0);
            assert_eq!(b.total, 0);
        }
    }

    #[test]
    fn multiplier_steps_every_three() {
        assert_eq!(calculate_score(true, 0, 0.0).multiplier, 1.0);
        assert_eq!(calculate_score(true, 2, 0.0).multiplier, 1.0);
        assert_eq!(calculate_score(true, 3, 0.0).multiplier, 1.5);
        assert_eq!(calculate_score(true, 6, 0.0).multiplier, 2.0);
        assert_eq!(calculate_score(true, 9, 0.0).multiplier, 2.5);
        assert_eq!(calculate_score(true, 12, 0.0).multiplier, 3.0);
        // Capped at 3x.
        assert_eq!(calculate_score(true, 30, 0.0).multiplier, 3.0);
    }

    #[test]
    fn streak_bonus_caps_at_twenty() {
        assert_eq!(calculate_score(true, 4, 0.0).streak_bonus, 8);
        assert_eq!(calculate_score(true, 10, 0.0).streak_bonus, 20);
        assert_eq!(calculate_score(true, 25, 0.0).streak_bonus, 20);
    }

    #[test]
    fn total_combines_parts() {
        // streak 7: multiplier 2.0 -> 20 points, bonus 14.
        let b = calculate_score(true, 7, 0.0);
        assert_eq!(b.points, 20);
        assert_eq!(b.streak_bonus, 14);
        assert_eq!(b.total, 34);
    }

    #[test]
    fn speed_bonus_adds_up_to_base_points() {
        let slow = calculate_score(true, 0, 0.0);
        let fast = calculate_score(true, 0, 1.0);
        assert_eq!(fast.total, slow.total + BASE_POINTS);
    }

    #[test]
    fn arithmetic_star_thresholds() {
        assert_eq!(stars_arithmetic(10, 10, 10), 3);
        assert_eq!(stars_arithmetic(9, 10, 5), 3);
        assert_eq!(stars_arithmetic(9, 10, 4), 2); // accuracy fine, streak short
        assert_eq!(stars_arithmetic(7, 10, 0), 2);
        assert_eq!(stars_arithmetic(5, 10, 0), 1);
        assert_eq!(stars_arithmetic(4, 10, 0), 0);
        assert_eq!(stars_arithmetic(4, 10, 3), 2); // streak alone earns 2
        assert_eq!(stars_arithmetic(0, 0, 0), 0);
    }

    #[test]
    fn counting_star_thresholds() {
        assert_eq!(stars_counting(8, 10), 3);
        assert_eq!(stars_counting(7, 10), 2);
        assert_eq!(stars_counting(6, 12), 2); // correct count alone earns 2
        assert_eq!(stars_counting(4, 10), 1);
        assert_eq!(stars_counting(3, 10), 0);
    }

    proptest! {
        #[test]
        fn total_non_decreasing_in_streak(streak in 0u32..30) {
            let a = calculate_score(true, streak, 0.0).total;
            let b = calculate_score(true, streak + 1, 0.0).total;
            prop_assert!(b >= a);
        }

        #[test]
        fn incorrect_is_always_zero(streak in 0u32..1000, speed in 0.0f64..1.0) {
            let b = calculate_score(false, streak, speed);
            prop_assert_eq!(b.total, 0);
            prop_assert_eq!(b.points, 0);
            prop_assert_eq!(b.streak_bonus, 0);
        }
    }
}
