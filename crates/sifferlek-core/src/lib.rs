//! # Sifferlek Core Library
//!
//! Core game logic for Sifferlek, a Swedish-language arithmetic and
//! counting game for young children. The library owns everything with
//! real invariants -- question generation, scoring, adaptive difficulty,
//! the round state machine, milestone detection, and durable progress --
//! while rendering, audio, and navigation live in thin presentation
//! layers on top.
//!
//! ## Architecture
//!
//! - **Round Engine**: a pure reducer over a closed action set; every
//!   transition is total, and invalid actions are no-ops rather than
//!   errors
//! - **Generators**: seedable question generation for both game modes
//! - **Storage**: versioned JSON records behind a pluggable key-value
//!   medium, with forward migration of legacy snapshots
//! - **Milestones**: once-only achievement detection feeding the sticker
//!   reward flow
//!
//! ## Key Components
//!
//! - [`RoundEngine`]: round state machine
//! - [`GameMode`]: policy object separating the arithmetic and counting
//!   games
//! - [`ProgressStore`] / [`StickerStore`]: durable cross-session state
//! - [`AbilityTracker`]: adaptive difficulty tracking

pub mod adaptive;
pub mod error;
pub mod events;
pub mod generator;
pub mod milestones;
pub mod mode;
pub mod question;
pub mod round;
pub mod scoring;
pub mod stickers;
pub mod storage;

pub use adaptive::AbilityTracker;
pub use error::{ConfigError, StorageError};
pub use events::GameEvent;
pub use milestones::{milestone, Milestone, MilestoneEvaluator, MILESTONES};
pub use mode::GameMode;
pub use question::{Question, QuestionKind};
pub use round::{Answer, GameAction, RoundEngine, RoundState, RoundSummary};
pub use scoring::{calculate_score, ScoreBreakdown};
pub use stickers::{Sticker, StickerBoard, StickerCollection, STICKER_LIBRARY};
pub use storage::{
    FileMedium, GameConfig, GameProgress, MemoryMedium, ProgressStore, StickerStore,
    StorageMedium,
};
