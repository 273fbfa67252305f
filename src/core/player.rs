//! Player identification and turn rotation.
//!
//! Players are numbered from 1, matching what is shown on screen
//! ("Player 1's turn"). A round supports 1-255 players.

use serde::{Deserialize, Serialize};

/// 1-based player seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The player who opens every round.
    pub const FIRST: PlayerId = PlayerId(1);

    /// Create a player ID from a 1-based seat number.
    ///
    /// Returns `None` for seat 0.
    #[must_use]
    pub const fn new(seat: u8) -> Option<Self> {
        if seat == 0 {
            None
        } else {
            Some(Self(seat))
        }
    }

    /// The 1-based seat number.
    #[must_use]
    pub const fn seat(self) -> u8 {
        self.0
    }

    /// The next player in rotation, wrapping from the last seat to the first.
    ///
    /// ```
    /// use shell_game::core::PlayerId;
    ///
    /// let third = PlayerId::new(3).unwrap();
    /// assert_eq!(third.next(3), PlayerId::FIRST);
    /// assert_eq!(PlayerId::FIRST.next(3).seat(), 2);
    /// ```
    #[must_use]
    pub fn next(self, player_count: u8) -> Self {
        if player_count <= 1 {
            return self;
        }
        Self(self.0 % player_count + 1)
    }

    /// Iterate over all seats for a round with `player_count` players.
    pub fn all(player_count: u8) -> impl Iterator<Item = PlayerId> {
        (1..=player_count).map(PlayerId)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
