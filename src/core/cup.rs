//! Cups and their positions on the table.

use serde::{Deserialize, Serialize};

/// How far a cup rises above its slot while being swapped, in slot units.
pub const LIFT_HEIGHT: f32 = 0.5;

/// A point in slot coordinates.
///
/// Not pixels: the presentation layer maps these to screen offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// This position raised by [`LIFT_HEIGHT`] (screen `y` grows downward).
    #[must_use]
    pub fn lifted(self) -> Self {
        Self::new(self.x, self.y - LIFT_HEIGHT)
    }
}

/// One cup on the table.
///
/// `index` is the cup's identity: the slot it started the round in. It stays
/// attached to the cup as shuffling moves it between slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cup {
    /// Stable identity.
    pub index: usize,
    /// Whether the token is under this cup.
    pub has_token: bool,
    /// Lifted by a correct guess (terminal for the round).
    pub revealed: bool,
    /// Taken out of play by a pyramid miss (terminal for the round).
    pub removed: bool,
    /// Just guessed wrong; cleared after the miss display delay.
    pub miss: bool,
}

impl Cup {
    /// A covered cup.
    #[must_use]
    pub const fn new(index: usize, has_token: bool) -> Self {
        Self {
            index,
            has_token,
            revealed: false,
            removed: false,
            miss: false,
        }
    }

    /// Whether a guess may still target this cup.
    #[must_use]
    pub const fn is_in_play(&self) -> bool {
        !self.revealed && !self.removed
    }

    /// Whether the cup is shown lifted (revealed or showing a miss).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.revealed || self.miss
    }

    /// Drop the transient flags and the reveal, keeping removal.
    #[must_use]
    pub const fn covered(self) -> Self {
        Self {
            revealed: false,
            miss: false,
            ..self
        }
    }
}
