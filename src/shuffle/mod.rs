//! Shuffle planning.
//!
//! A shuffle is a handful of swap rounds. Each round picks two distinct
//! in-play slots and moves their cups through four steps:
//!
//! 1. `Lift(a)`: raise the first cup
//! 2. `Lift(b)`: raise the second cup
//! 3. `Cross(a, b)`: each cup moves over the other's slot
//! 4. `Land(a, b)`: both come down and the cups trade slots
//!
//! Every round is a transposition, so the token is never duplicated or
//! lost. The sequencer only plans; `RoundState::apply_shuffle_step` applies.

mod sequencer;

pub use sequencer::{ShufflePlan, ShuffleSequencer, TimedStep};

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// One animated step of a swap round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShuffleStep {
    /// Raise the cup in `slot`.
    Lift { slot: usize },
    /// Move the raised cups in `a` and `b` over each other's slot.
    Cross { a: usize, b: usize },
    /// Lower both cups and swap them between `a` and `b`.
    Land { a: usize, b: usize },
}

impl ShuffleStep {
    /// Slots this step touches.
    #[must_use]
    pub fn slots(&self) -> SmallVec<[usize; 2]> {
        match *self {
            ShuffleStep::Lift { slot } => smallvec![slot],
            ShuffleStep::Cross { a, b } | ShuffleStep::Land { a, b } => smallvec![a, b],
        }
    }

    /// The four steps of swapping `a` and `b`.
    #[must_use]
    pub fn swap_round(a: usize, b: usize) -> [ShuffleStep; 4] {
        [
            ShuffleStep::Lift { slot: a },
            ShuffleStep::Lift { slot: b },
            ShuffleStep::Cross { a, b },
            ShuffleStep::Land { a, b },
        ]
    }
}
