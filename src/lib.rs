//! # shell-game
//!
//! Headless engine for the cup-and-ball shell game: a token is hidden under
//! one of several cups, the cups are shuffled through a timed series of
//! swaps, and players take turns guessing where the token went.
//!
//! ## Design Principles
//!
//! 1. **Snapshot-and-replace**: every transition returns a new `RoundState`.
//!    Persistent `im` vectors keep the copies O(1).
//!
//! 2. **Logical time**: pacing lives in a `Timeline` of delayed steps that the
//!    host drives with `advance(elapsed_ms)`. No threads, no timers.
//!
//! 3. **Ignore stale input**: taps that arrive in the wrong phase, on a
//!    resolved cup, or for a discarded round change nothing.
//!
//! ## Modules
//!
//! - `core`: Players, cups, configuration, RNG, round state, snapshots
//! - `rules`: Classic and pyramid rule sets and their slot layouts
//! - `shuffle`: Swap planning and step timing
//! - `schedule`: Ordered, generation-guarded step queue
//! - `round`: The timed round machine and the UI-facing session

pub mod core;
pub mod error;
pub mod round;
pub mod rules;
pub mod schedule;
pub mod shuffle;

// Re-export commonly used types
pub use crate::core::{
    Cup, CupView, GameRng, GuessOutcome, IgnoreReason, Phase, PlayerId, Position,
    RoundConfig, RoundSnapshot, RoundState, Timing,
};

pub use crate::error::{Result, ShellGameError};

pub use crate::round::{RoundAction, RoundMachine, Session};

pub use crate::rules::{MissPolicy, Rules};

pub use crate::schedule::{Scheduled, Timeline};

pub use crate::shuffle::{ShufflePlan, ShuffleSequencer, ShuffleStep, TimedStep};
