//! Render data handed to the presentation layer after every transition.
//!
//! A snapshot is self-contained: the presentation layer redraws from it
//! alone and never reads `RoundState` directly. The token is only exposed
//! when it should be visible on screen.

use serde::{Deserialize, Serialize};

use super::cup::Position;
use super::player::PlayerId;
use super::state::Phase;
use crate::error::Result;
use crate::rules::Rules;

/// What to draw for one cup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CupView {
    /// Stable identity; key animations on this.
    pub index: usize,
    /// Animation target in slot coordinates.
    pub position: Position,
    /// Draw the token under this cup.
    pub shows_token: bool,
    /// Draw the cup lifted.
    pub open: bool,
    /// Draw the miss marker.
    pub miss: bool,
    /// Do not draw this cup.
    pub removed: bool,
}

/// Everything the presentation layer needs to redraw a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub generation: u64,
    pub phase: Phase,
    pub rules: Rules,
    pub current_player: PlayerId,
    pub player_count: u8,
    /// Cups by slot.
    pub cups: Vec<CupView>,
    pub winner_message: Option<String>,
}

impl RoundSnapshot {
    /// Whether any cup shows a miss.
    #[must_use]
    pub fn miss_shown(&self) -> bool {
        self.cups.iter().any(|cup| cup.miss)
    }

    /// Headline text for the current phase.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::ShowingToken => "Watch the ball!".to_string(),
            Phase::Shuffling if self.miss_shown() => "Missed!".to_string(),
            Phase::Shuffling => "Shuffling...".to_string(),
            Phase::Playing => format!("{}'s turn", self.current_player),
            Phase::RoundOver => self
                .winner_message
                .clone()
                .unwrap_or_else(|| "Round over".to_string()),
        }
    }

    /// Encode for hand-off to another thread or process.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot produced by [`RoundSnapshot::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellGameError;

    fn snapshot(phase: Phase) -> RoundSnapshot {
        RoundSnapshot {
            generation: 0,
            phase,
            rules: Rules::Classic,
            current_player: PlayerId::new(2).unwrap(),
            player_count: 3,
            cups: vec![CupView {
                index: 0,
                position: Position::new(0.0, 0.0),
                shows_token: false,
                open: false,
                miss: false,
                removed: false,
            }],
            winner_message: None,
        }
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(snapshot(Phase::ShowingToken).status_line(), "Watch the ball!");
        assert_eq!(snapshot(Phase::Shuffling).status_line(), "Shuffling...");
        assert_eq!(snapshot(Phase::Playing).status_line(), "Player 2's turn");
        assert_eq!(snapshot(Phase::RoundOver).status_line(), "Round over");

        let mut missed = snapshot(Phase::Shuffling);
        missed.cups[0].miss = true;
        assert!(missed.miss_shown());
        assert_eq!(missed.status_line(), "Missed!");

        let mut won = snapshot(Phase::RoundOver);
        won.winner_message = Some("Player 2 wins!".to_string());
        assert_eq!(won.status_line(), "Player 2 wins!");
    }

    #[test]
    fn test_encode_decode() {
        let original = snapshot(Phase::Playing);
        let bytes = original.encode().unwrap();
        assert_eq!(RoundSnapshot::decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_decode_garbage() {
        let result = RoundSnapshot::decode(&[0xff]);
        assert!(matches!(result, Err(ShellGameError::Snapshot(_))));
    }
}
