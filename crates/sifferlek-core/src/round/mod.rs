//! Round state machine.
//!
//! A round is a fixed sequence of ten questions played with three hearts.
//! The engine is a pure reducer over a closed set of actions; invalid
//! actions return the state unchanged, never an error.

mod engine;
mod state;
mod summary;

pub use engine::{reduce, RoundEngine};
pub use state::{Answer, GameAction, RoundState, MAX_HEARTS, ROUND_SIZE};
pub use summary::RoundSummary;
