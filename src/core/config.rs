//! Round configuration types.
//!
//! The presentation layer edits a `RoundConfig` before a round starts:
//! - `RoundConfig`: players, cups, rule set, shuffle length
//! - `Timing`: the pacing of every scheduled step
//!
//! Counts arriving from the UI are clamped into range rather than
//! rejected. `RoundConfig::try_new` is the strict alternative for hosts
//! loading a config from elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellGameError};
use crate::rules::Rules;

/// Fewest players a round can have.
pub const MIN_PLAYERS: u8 = 1;

/// Fewest cups a round can have.
pub const MIN_CUPS: u8 = 2;

/// Most cups a round can have (five full pyramid rows).
pub const MAX_CUPS: u8 = 15;

/// Default number of swap rounds per shuffle.
pub const DEFAULT_SHUFFLE_ROUNDS: u8 = 4;

/// Step delays in milliseconds.
///
/// Each delay is measured from the step before it on the round's timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// How long the token stays visible before the first shuffle.
    pub show_token_ms: u64,
    /// Pause after covering the cups, before the first lift.
    pub cover_ms: u64,
    /// Gap after each lift.
    pub lift_ms: u64,
    /// Gap after the cross-over.
    pub cross_ms: u64,
    /// Gap after landing, before the next round or the end of the shuffle.
    pub land_ms: u64,
    /// How long a missed cup stays flagged.
    pub miss_display_ms: u64,
    /// Pause after a miss is cleared.
    pub reset_pause_ms: u64,
    /// Pause before a re-shuffle starts.
    pub reshuffle_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            show_token_ms: 1500,
            cover_ms: 300,
            lift_ms: 60,
            cross_ms: 80,
            land_ms: 120,
            miss_display_ms: 1200,
            reset_pause_ms: 500,
            reshuffle_pause_ms: 300,
        }
    }
}

impl Timing {
    /// Every delay set to zero. Handy for driving rounds in tests.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            show_token_ms: 0,
            cover_ms: 0,
            lift_ms: 0,
            cross_ms: 0,
            land_ms: 0,
            miss_display_ms: 0,
            reset_pause_ms: 0,
            reshuffle_pause_ms: 0,
        }
    }

    /// Total time a shuffle of `rounds` swap rounds occupies on the timeline,
    /// from covering the cups to play resuming.
    #[must_use]
    pub fn shuffle_duration_ms(&self, rounds: u8) -> u64 {
        if rounds == 0 {
            return self.cover_ms;
        }
        let per_round = 2 * self.lift_ms + self.cross_ms + self.land_ms;
        self.cover_ms + per_round * u64::from(rounds)
    }

    /// Delay between a miss resolving and the re-shuffle covering the cups.
    #[must_use]
    pub fn reshuffle_delay_ms(&self) -> u64 {
        self.reset_pause_ms + self.reshuffle_pause_ms
    }
}

/// Configuration for a single round.
///
/// Fixed once the round starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Number of players taking turns (1-255).
    pub player_count: u8,

    /// Number of cups on the table (2-15).
    pub cup_count: u8,

    /// Which rule set resolves a wrong guess.
    pub rules: Rules,

    /// Swap rounds per shuffle (at least 1).
    pub shuffle_rounds: u8,

    /// Move the token to a fresh cup after a classic miss.
    pub rehide_on_miss: bool,

    /// Step pacing.
    pub timing: Timing,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::for_rules(Rules::Classic)
    }
}

impl RoundConfig {
    /// Create a configuration, clamping counts into range.
    #[must_use]
    pub fn new(player_count: u32, cup_count: u32) -> Self {
        Self {
            player_count: clamp_players(i64::from(player_count)),
            cup_count: clamp_cups(i64::from(cup_count)),
            ..Self::default()
        }
    }

    /// Create a configuration, rejecting out-of-range counts.
    pub fn try_new(player_count: u32, cup_count: u32) -> Result<Self> {
        let config = Self {
            player_count: u8::try_from(player_count)
                .map_err(|_| ShellGameError::InvalidPlayerCount(player_count))?,
            cup_count: u8::try_from(cup_count)
                .map_err(|_| ShellGameError::InvalidCupCount(cup_count))?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration for a rule set: two players and the rule
    /// set's usual cup count.
    #[must_use]
    pub fn for_rules(rules: Rules) -> Self {
        Self {
            player_count: 2,
            cup_count: rules.default_cup_count(),
            rules,
            shuffle_rounds: DEFAULT_SHUFFLE_ROUNDS,
            rehide_on_miss: false,
            timing: Timing::default(),
        }
    }

    /// Check every field is in range.
    ///
    /// Public fields can be written directly, so hosts that deserialize a
    /// config should call this before starting a round.
    pub fn validate(&self) -> Result<()> {
        if self.player_count < MIN_PLAYERS {
            return Err(ShellGameError::InvalidPlayerCount(u32::from(self.player_count)));
        }
        if !(MIN_CUPS..=MAX_CUPS).contains(&self.cup_count) {
            return Err(ShellGameError::InvalidCupCount(u32::from(self.cup_count)));
        }
        if self.shuffle_rounds == 0 {
            return Err(ShellGameError::InvalidShuffleRounds);
        }
        Ok(())
    }

    /// Apply increment/decrement deltas from the setup screen, clamping
    /// so that `player_count >= 1` and `cup_count >= 2`.
    ///
    /// ```
    /// use shell_game::core::RoundConfig;
    ///
    /// let config = RoundConfig::new(1, 3).adjust(-1, 0);
    /// assert_eq!(config.player_count, 1);
    /// ```
    #[must_use]
    pub fn adjust(mut self, player_delta: i32, cup_delta: i32) -> Self {
        self.player_count = clamp_players(i64::from(self.player_count) + i64::from(player_delta));
        self.cup_count = clamp_cups(i64::from(self.cup_count) + i64::from(cup_delta));
        self
    }

    /// Switch rule set, resetting the cup count to its default.
    #[must_use]
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self.cup_count = rules.default_cup_count();
        self
    }

    /// Set the player count (clamped).
    #[must_use]
    pub fn with_players(mut self, player_count: u32) -> Self {
        self.player_count = clamp_players(i64::from(player_count));
        self
    }

    /// Set the cup count (clamped).
    #[must_use]
    pub fn with_cups(mut self, cup_count: u32) -> Self {
        self.cup_count = clamp_cups(i64::from(cup_count));
        self
    }

    /// Set the number of swap rounds per shuffle (at least 1).
    #[must_use]
    pub fn with_shuffle_rounds(mut self, rounds: u8) -> Self {
        self.shuffle_rounds = rounds.max(1);
        self
    }

    /// Re-hide the token after every classic miss.
    #[must_use]
    pub fn with_rehide_on_miss(mut self, rehide: bool) -> Self {
        self.rehide_on_miss = rehide;
        self
    }

    /// Set step pacing.
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Number of cups as an index bound.
    #[must_use]
    pub fn cups(&self) -> usize {
        usize::from(self.cup_count)
    }

    /// Whether turns rotate between players.
    #[must_use]
    pub fn is_multiplayer(&self) -> bool {
        self.player_count > 1
    }
}

fn clamp_players(count: i64) -> u8 {
    // Bounds fit in u8, so the cast cannot truncate.
    count.clamp(i64::from(MIN_PLAYERS), i64::from(u8::MAX)) as u8
}

fn clamp_cups(count: i64) -> u8 {
    count.clamp(i64::from(MIN_CUPS), i64::from(MAX_CUPS)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoundConfig::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.cup_count, 3);
        assert_eq!(config.rules, Rules::Classic);
        assert_eq!(config.shuffle_rounds, DEFAULT_SHUFFLE_ROUNDS);
        assert!(!config.rehide_on_miss);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_clamps() {
        let config = RoundConfig::new(0, 1);
        assert_eq!(config.player_count, 1);
        assert_eq!(config.cup_count, 2);

        let config = RoundConfig::new(1000, 1000);
        assert_eq!(config.player_count, u8::MAX);
        assert_eq!(config.cup_count, MAX_CUPS);
    }

    #[test]
    fn test_try_new_rejects() {
        assert!(matches!(
            RoundConfig::try_new(0, 3),
            Err(ShellGameError::InvalidPlayerCount(0))
        ));
        assert!(matches!(
            RoundConfig::try_new(300, 3),
            Err(ShellGameError::InvalidPlayerCount(300))
        ));
        assert!(matches!(
            RoundConfig::try_new(2, 1),
            Err(ShellGameError::InvalidCupCount(1))
        ));
        assert!(matches!(
            RoundConfig::try_new(2, 16),
            Err(ShellGameError::InvalidCupCount(16))
        ));
        assert!(RoundConfig::try_new(4, 5).is_ok());
    }

    #[test]
    fn test_validate_shuffle_rounds() {
        let mut config = RoundConfig::default();
        config.shuffle_rounds = 0;
        assert!(matches!(config.validate(), Err(ShellGameError::InvalidShuffleRounds)));
    }

    #[test]
    fn test_adjust_floor_clamp() {
        let config = RoundConfig::new(1, 2).adjust(-1, -1);
        assert_eq!(config.player_count, 1);
        assert_eq!(config.cup_count, 2);

        let config = config.adjust(-5, -5);
        assert_eq!(config.player_count, 1);
        assert_eq!(config.cup_count, 2);
    }

    #[test]
    fn test_adjust_increments() {
        let config = RoundConfig::default().adjust(1, 2);
        assert_eq!(config.player_count, 3);
        assert_eq!(config.cup_count, 5);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RoundConfig::default()
            .with_rules(Rules::Pyramid)
            .with_players(4)
            .with_shuffle_rounds(0)
            .with_rehide_on_miss(true)
            .with_timing(Timing::instant());

        assert_eq!(config.rules, Rules::Pyramid);
        assert_eq!(config.cup_count, Rules::Pyramid.default_cup_count());
        assert_eq!(config.player_count, 4);
        assert_eq!(config.shuffle_rounds, 1);
        assert!(config.rehide_on_miss);
        assert_eq!(config.timing, Timing::instant());
    }

    #[test]
    fn test_shuffle_duration() {
        let timing = Timing::default();
        assert_eq!(timing.shuffle_duration_ms(4), 300 + 4 * (60 + 60 + 80 + 120));
        assert_eq!(timing.shuffle_duration_ms(0), 300);
        assert_eq!(timing.reshuffle_delay_ms(), 800);
    }

    #[test]
    fn test_serialization() {
        let config = RoundConfig::default().with_players(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RoundConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
