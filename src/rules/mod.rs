//! Rule sets for resolving wrong guesses.
//!
//! Two variants share one round state machine:
//! - **Classic**: cups sit in a row; a miss resets the table and re-shuffles
//! - **Pyramid**: cups stack in centred rows; a missed cup leaves play for good
//!
//! The state machine asks the rule set for the table layout and for what a
//! miss does, and never branches on the variant anywhere else.

pub mod layout;

pub use layout::{pyramid_cell, slot_layout};

use serde::{Deserialize, Serialize};

/// Which rule set a round plays under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rules {
    /// Reveal in place, then reset and re-shuffle after a miss.
    #[default]
    Classic,
    /// Permanently remove a missed cup, then re-shuffle the rest.
    Pyramid,
}

/// What happens to a missed cup once its miss flag clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissPolicy {
    /// Every cup goes back to unrevealed.
    ResetAll,
    /// The missed cup is removed from play.
    Remove,
}

impl Rules {
    /// Cup count a fresh setup screen starts with.
    #[must_use]
    pub const fn default_cup_count(self) -> u8 {
        match self {
            Rules::Classic => 3,
            Rules::Pyramid => 6,
        }
    }

    /// How a miss is resolved.
    #[must_use]
    pub const fn miss_policy(self) -> MissPolicy {
        match self {
            Rules::Classic => MissPolicy::ResetAll,
            Rules::Pyramid => MissPolicy::Remove,
        }
    }

    /// Whether `begin_shuffle` may bring removed cups back.
    #[must_use]
    pub const fn removal_is_permanent(self) -> bool {
        matches!(self.miss_policy(), MissPolicy::Remove)
    }
}

impl std::fmt::Display for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rules::Classic => write!(f, "classic"),
            Rules::Pyramid => write!(f, "pyramid"),
        }
    }
}
