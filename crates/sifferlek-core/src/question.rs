//! Question model shared by both game modes.

use serde::{Deserialize, Serialize};

/// Which generator produced a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Addition fact, prompt like `"3 + 4"`.
    Arithmetic,
    /// Object counting, prompt encodes `"Hur många <namn>?|<emoji>|<antal>"`.
    Counting,
}

/// A single question with its four answer options.
///
/// Immutable once generated. Options always contain the correct answer,
/// hold exactly four distinct positive values, and arrive pre-shuffled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub answer: u32,
    pub options: Vec<u32>,
    pub level: u8,
    pub kind: QuestionKind,
}

impl Question {
    /// Strict numeric equality against the correct answer.
    pub fn is_correct(&self, value: u32) -> bool {
        value == self.answer
    }

    /// Canonical key identifying this question's content for miss tracking.
    ///
    /// Arithmetic facts use the expression itself (`"7 + 8"`), counting
    /// facts use the target count (`"count_12"`).
    pub fn fact_key(&self) -> String {
        match self.kind {
            QuestionKind::Arithmetic => self.prompt.replace(" = ?", "").trim().to_string(),
            QuestionKind::Counting => format!("count_{}", self.answer),
        }
    }
}

/// Icon + Swedish name pair for counting questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingTheme {
    pub emoji: &'static str,
    pub name: &'static str,
}

/// Themes available to the counting generator, picked independently of
/// the target count.
pub const COUNTING_THEMES: [CountingTheme; 6] = [
    CountingTheme { emoji: "🍎", name: "äpplen" },
    CountingTheme { emoji: "🍊", name: "apelsiner" },
    CountingTheme { emoji: "⭐", name: "stjärnor" },
    CountingTheme { emoji: "🐟", name: "fiskar" },
    CountingTheme { emoji: "🐴", name: "hästar" },
    CountingTheme { emoji: "🐙", name: "bläckfiskar" },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind, prompt: &str, answer: u32) -> Question {
        Question {
            id: "q".to_string(),
            prompt: prompt.to_string(),
            answer,
            options: vec![answer, answer + 1, answer + 2, answer + 3],
            level: 1,
            kind,
        }
    }

    #[test]
    fn arithmetic_fact_key_is_the_expression() {
        let q = question(QuestionKind::Arithmetic, "7 + 8", 15);
        assert_eq!(q.fact_key(), "7 + 8");
    }

    #[test]
    fn counting_fact_key_uses_the_count() {
        let q = question(QuestionKind::Counting, "Hur många fiskar?|🐟|12", 12);
        assert_eq!(q.fact_key(), "count_12");
    }

    #[test]
    fn correctness_is_strict_equality() {
        let q = question(QuestionKind::Arithmetic, "2 + 2", 4);
        assert!(q.is_correct(4));
        assert!(!q.is_correct(5));
    }
}
