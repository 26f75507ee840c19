//! Versioned cross-session player progress.
//!
//! Stored as JSON under the `profile` key, tagged with a `version` field.
//! Older snapshots (missing or unknown version, or data under the legacy
//! `progress` key) are migrated forward on load: recognized legacy fields
//! map onto the current shape, unknown fields are dropped, absent fields
//! take defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::round::{RoundState, RoundSummary};

use super::StorageMedium;

/// Current storage key for the player profile.
const PROGRESS_KEY: &str = "profile";
/// Pre-versioning storage key, migrated and removed on first load.
const LEGACY_PROGRESS_KEY: &str = "progress";
/// Current schema version tag.
const CURRENT_VERSION: &str = "v1";

/// Per-difficulty-level aggregate statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub questions_answered: u32,
    pub correct_answers: u32,
    /// Mean seconds per question.
    pub average_time: f64,
}

/// Durable cross-session progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub version: String,
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default = "Utc::now")]
    pub last_played: DateTime<Utc>,
    #[serde(default = "default_level")]
    pub current_level: u8,
    #[serde(default)]
    pub stats_by_level: BTreeMap<u8, LevelStats>,
    /// Fact key -> lifetime miss count.
    #[serde(default)]
    pub missed_facts: BTreeMap<String, u32>,
    /// `%Y-%m-%d` date -> challenge completed.
    #[serde(default)]
    pub daily_challenges: BTreeMap<String, bool>,
    /// Reserved for a future rewards shop.
    #[serde(default)]
    pub coins: u32,
}

fn default_level() -> u8 {
    1
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            total_score: 0,
            best_streak: 0,
            last_played: Utc::now(),
            current_level: 1,
            stats_by_level: BTreeMap::new(),
            missed_facts: BTreeMap::new(),
            daily_challenges: BTreeMap::new(),
            coins: 0,
        }
    }
}

/// Pre-versioning on-disk shape. Only the recognized fields survive
/// migration.
#[derive(Debug, Default, Deserialize)]
struct LegacyProgress {
    #[serde(default)]
    score: Option<u32>,
    #[serde(default)]
    difficulty: Option<u8>,
    #[serde(default, rename = "lastPlayed")]
    last_played: Option<DateTime<Utc>>,
}

impl LegacyProgress {
    fn migrate(self) -> GameProgress {
        let mut progress = GameProgress::default();
        if let Some(score) = self.score {
            progress.total_score = score;
        }
        if let Some(difficulty) = self.difficulty {
            progress.current_level = difficulty.clamp(1, 4);
        }
        if let Some(last_played) = self.last_played {
            progress.last_played = last_played;
        }
        progress
    }
}

/// Partial update merged into the stored record by [`ProgressStore::save`].
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub total_score: Option<u32>,
    pub best_streak: Option<u32>,
    pub current_level: Option<u8>,
    pub stats_by_level: BTreeMap<u8, LevelStats>,
    pub missed_facts: BTreeMap<String, u32>,
    pub daily_challenges: BTreeMap<String, bool>,
    pub coins: Option<u32>,
}

/// Load/save gateway for [`GameProgress`].
#[derive(Debug)]
pub struct ProgressStore<M: StorageMedium> {
    medium: M,
}

impl<M: StorageMedium> ProgressStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Load progress, migrating legacy snapshots forward and falling back
    /// to defaults on corruption. Never fails.
    pub fn load(&mut self) -> GameProgress {
        if let Some(raw) = self.medium.get(PROGRESS_KEY) {
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => {
                    if value.get("version").and_then(|v| v.as_str()) == Some(CURRENT_VERSION) {
                        match serde_json::from_value::<GameProgress>(value) {
                            Ok(progress) => return progress,
                            Err(e) => {
                                eprintln!("Warning: corrupt progress record, resetting: {e}");
                                return GameProgress::default();
                            }
                        }
                    }
                    // Versionless or unknown version: treat as legacy.
                    let legacy: LegacyProgress =
                        serde_json::from_value(value).unwrap_or_default();
                    return legacy.migrate();
                }
                Err(e) => {
                    eprintln!("Warning: unreadable progress record, resetting: {e}");
                    return GameProgress::default();
                }
            }
        }

        // Pre-versioning key: migrate, persist under the new key, clean up.
        if let Some(raw) = self.medium.get(LEGACY_PROGRESS_KEY) {
            let legacy: LegacyProgress = serde_json::from_str(&raw).unwrap_or_default();
            let migrated = legacy.migrate();
            if self.persist(&migrated).is_ok() {
                self.medium.remove(LEGACY_PROGRESS_KEY);
            }
            return migrated;
        }

        GameProgress::default()
    }

    /// Merge a partial update into the stored record and persist it.
    ///
    /// Best streak never decreases; maps merge key-wise with update
    /// entries winning; `last_played` is refreshed.
    pub fn save(&mut self, update: ProgressUpdate) -> Result<GameProgress, StorageError> {
        let mut progress = self.load();
        if let Some(total_score) = update.total_score {
            progress.total_score = total_score;
        }
        if let Some(best_streak) = update.best_streak {
            progress.best_streak = progress.best_streak.max(best_streak);
        }
        if let Some(current_level) = update.current_level {
            progress.current_level = current_level;
        }
        if let Some(coins) = update.coins {
            progress.coins = coins;
        }
        progress.stats_by_level.extend(update.stats_by_level);
        progress.missed_facts.extend(update.missed_facts);
        progress.daily_challenges.extend(update.daily_challenges);
        progress.last_played = Utc::now();
        progress.version = CURRENT_VERSION.to_string();

        self.persist(&progress)?;
        Ok(progress)
    }

    /// Round-end checkpoint: fold a finished round's results into the
    /// durable record.
    pub fn record_round(
        &mut self,
        summary: &RoundSummary,
        state: &RoundState,
    ) -> Result<GameProgress, StorageError> {
        let existing = self.load();

        let mut missed = existing.missed_facts.clone();
        for (fact, count) in &state.missed_facts {
            *missed.entry(fact.clone()).or_insert(0) += count;
        }

        let mut stats = existing
            .stats_by_level
            .get(&state.level)
            .copied()
            .unwrap_or_default();
        let prior = stats.questions_answered as f64;
        let added = summary.total_questions as f64;
        if prior + added > 0.0 {
            let added_avg = if summary.total_questions > 0 {
                summary.elapsed_secs as f64 / added
            } else {
                0.0
            };
            stats.average_time =
                (stats.average_time * prior + added_avg * added) / (prior + added);
        }
        stats.questions_answered += summary.total_questions;
        stats.correct_answers += summary.correct_answers;

        self.save(ProgressUpdate {
            total_score: Some(state.effective_total_score()),
            best_streak: Some(state.best_streak),
            current_level: Some(state.level),
            stats_by_level: BTreeMap::from([(state.level, stats)]),
            missed_facts: missed,
            ..Default::default()
        })
    }

    /// Write-through increment of one fact's miss count.
    pub fn record_missed_fact(&mut self, fact: &str) -> Result<(), StorageError> {
        let progress = self.load();
        let count = progress.missed_facts.get(fact).copied().unwrap_or(0) + 1;
        self.save(ProgressUpdate {
            missed_facts: BTreeMap::from([(fact.to_string(), count)]),
            ..Default::default()
        })?;
        Ok(())
    }

    /// Whether today's daily challenge is already done.
    pub fn is_daily_challenge_complete(&mut self) -> bool {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.load().daily_challenges.get(&today).copied().unwrap_or(false)
    }

    /// Mark today's daily challenge as done.
    pub fn complete_daily_challenge(&mut self) -> Result<(), StorageError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.save(ProgressUpdate {
            daily_challenges: BTreeMap::from([(today, true)]),
            ..Default::default()
        })?;
        Ok(())
    }

    /// Drop all stored progress, current and legacy.
    pub fn clear(&mut self) {
        self.medium.remove(PROGRESS_KEY);
        self.medium.remove(LEGACY_PROGRESS_KEY);
    }

    fn persist(&mut self, progress: &GameProgress) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(progress).map_err(|source| {
            StorageError::SerializeFailed {
                key: PROGRESS_KEY.to_string(),
                source,
            }
        })?;
        self.medium.set(PROGRESS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryMedium;

    fn store() -> ProgressStore<MemoryMedium> {
        ProgressStore::new(MemoryMedium::new())
    }

    #[test]
    fn missing_record_yields_defaults() {
        let mut s = store();
        let p = s.load();
        assert_eq!(p.version, CURRENT_VERSION);
        assert_eq!(p.total_score, 0);
        assert_eq!(p.current_level, 1);
    }

    #[test]
    fn corrupt_json_falls_back_to_defaults() {
        let mut medium = MemoryMedium::new();
        medium.set(PROGRESS_KEY, "{not json").unwrap();
        let mut s = ProgressStore::new(medium);
        assert_eq!(s.load(), GameProgress::default());
    }

    #[test]
    fn save_round_trips() {
        let mut s = store();
        s.save(ProgressUpdate {
            total_score: Some(120),
            best_streak: Some(6),
            current_level: Some(2),
            ..Default::default()
        })
        .unwrap();
        let p = s.load();
        assert_eq!(p.total_score, 120);
        assert_eq!(p.best_streak, 6);
        assert_eq!(p.current_level, 2);
    }

    #[test]
    fn best_streak_never_decreases() {
        let mut s = store();
        s.save(ProgressUpdate {
            best_streak: Some(8),
            ..Default::default()
        })
        .unwrap();
        let p = s
            .save(ProgressUpdate {
                best_streak: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(p.best_streak, 8);
    }

    #[test]
    fn versionless_record_is_migrated() {
        let mut medium = MemoryMedium::new();
        medium
            .set(
                PROGRESS_KEY,
                r#"{"score": 75, "difficulty": 3, "bestScore": 99}"#,
            )
            .unwrap();
        let mut s = ProgressStore::new(medium);
        let p = s.load();
        assert_eq!(p.version, CURRENT_VERSION);
        assert_eq!(p.total_score, 75);
        assert_eq!(p.current_level, 3);
        // Unrecognized legacy fields are dropped.
        assert_eq!(p.best_streak, 0);
    }

    #[test]
    fn legacy_key_is_migrated_and_removed() {
        let mut medium = MemoryMedium::new();
        medium
            .set(LEGACY_PROGRESS_KEY, r#"{"score": 40}"#)
            .unwrap();
        let mut s = ProgressStore::new(medium);
        let p = s.load();
        assert_eq!(p.total_score, 40);
        // Re-saved under the current key; the old key is gone.
        assert!(s.medium.get(LEGACY_PROGRESS_KEY).is_none());
        let again = s.load();
        assert_eq!(again.total_score, 40);
    }

    #[test]
    fn checkpoint_keeps_prior_total_when_resumed() {
        use crate::mode::GameMode;
        use rand::SeedableRng;
        use rand_pcg::Mcg128Xsl64;

        let mut s = store();
        s.save(ProgressUpdate {
            total_score: Some(120),
            ..Default::default()
        })
        .unwrap();

        // A later session resumes from the stored total before playing.
        let stored = s.load();
        let mut rng = Mcg128Xsl64::seed_from_u64(4);
        let mut state = RoundState::with_progress(
            GameMode::Arithmetic,
            1,
            1,
            stored.total_score,
            &mut rng,
        );
        state.score = 30;
        state.correct_count = 3;
        state.answered_count = 10;
        let summary = RoundSummary::from_state(&state, GameMode::Arithmetic, Utc::now());
        s.record_round(&summary, &state).unwrap();
        assert_eq!(s.load().total_score, 150);

        // A zero-score round never pulls the stored total down.
        let state = RoundState::with_progress(GameMode::Arithmetic, 1, 1, 150, &mut rng);
        let summary = RoundSummary::from_state(&state, GameMode::Arithmetic, Utc::now());
        s.record_round(&summary, &state).unwrap();
        assert_eq!(s.load().total_score, 150);
    }

    #[test]
    fn record_round_accumulates_level_stats() {
        use crate::mode::GameMode;
        use rand::SeedableRng;
        use rand_pcg::Mcg128Xsl64;

        let mut s = store();
        let mut rng = Mcg128Xsl64::seed_from_u64(8);
        let mut state = RoundState::new(GameMode::Counting, 2, &mut rng);
        state.correct_count = 7;
        state.answered_count = 10;
        state.missed_facts.insert("count_12".to_string(), 2);
        let summary = RoundSummary::from_state(&state, GameMode::Counting, Utc::now());
        s.record_round(&summary, &state).unwrap();

        let p = s.load();
        let stats = p.stats_by_level.get(&2).unwrap();
        assert_eq!(stats.questions_answered, 10);
        assert_eq!(stats.correct_answers, 7);
        assert_eq!(p.missed_facts.get("count_12"), Some(&2));
        assert_eq!(p.current_level, 2);
    }

    #[test]
    fn missed_fact_write_through_increments() {
        let mut s = store();
        s.record_missed_fact("7 + 8").unwrap();
        s.record_missed_fact("7 + 8").unwrap();
        assert_eq!(s.load().missed_facts.get("7 + 8"), Some(&2));
    }

    #[test]
    fn daily_challenge_flag() {
        let mut s = store();
        assert!(!s.is_daily_challenge_complete());
        s.complete_daily_challenge().unwrap();
        assert!(s.is_daily_challenge_complete());
    }

    #[test]
    fn clear_removes_everything() {
        let mut s = store();
        s.save(ProgressUpdate {
            total_score: Some(10),
            ..Default::default()
        })
        .unwrap();
        s.clear();
        assert_eq!(s.load().total_score, 0);
    }
}
