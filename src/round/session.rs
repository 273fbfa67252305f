//! The intent boundary used by a presentation layer.
//!
//! A `Session` holds the setup screen's configuration and, once a round is
//! started, the running `RoundMachine`. Every intent the UI can raise maps
//! to one method here.

use crate::core::{GameRng, GuessOutcome, RoundConfig, RoundSnapshot};
use crate::error::Result;
use crate::rules::Rules;

use super::machine::RoundMachine;

/// Setup state plus the active round, if any.
#[derive(Clone, Debug)]
pub struct Session {
    setup: RoundConfig,
    rng: GameRng,
    round: Option<RoundMachine>,
    next_generation: u64,
}

impl Session {
    /// A session with default setup and a seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_parts(RoundConfig::default(), GameRng::new(seed))
    }

    /// A session seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_parts(RoundConfig::default(), GameRng::from_entropy())
    }

    /// A session with a host-provided setup.
    pub fn with_config(config: RoundConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, GameRng::new(seed)))
    }

    fn from_parts(setup: RoundConfig, rng: GameRng) -> Self {
        Self {
            setup,
            rng,
            round: None,
            next_generation: 0,
        }
    }

    /// The configuration the next round will use.
    #[must_use]
    pub fn setup(&self) -> &RoundConfig {
        &self.setup
    }

    /// The active round.
    #[must_use]
    pub fn round(&self) -> Option<&RoundMachine> {
        self.round.as_ref()
    }

    /// Render data for the active round.
    #[must_use]
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        self.round.as_ref().map(RoundMachine::snapshot)
    }

    /// Increment or decrement the player and cup counts on the setup screen.
    ///
    /// Ignored while a round is running.
    pub fn configure_round(&mut self, player_delta: i32, cup_delta: i32) -> &RoundConfig {
        if self.round.is_some() {
            log::debug!("configure_round ignored: a round is running");
        } else {
            self.setup = self.setup.adjust(player_delta, cup_delta);
        }
        &self.setup
    }

    /// Pick the rule set for the next round.
    ///
    /// Ignored while a round is running.
    pub fn set_rules(&mut self, rules: Rules) -> &RoundConfig {
        if self.round.is_some() {
            log::debug!("set_rules ignored: a round is running");
        } else {
            self.setup = self.setup.with_rules(rules);
        }
        &self.setup
    }

    /// Deal a new round from the current setup, replacing any active one.
    pub fn start_round(&mut self) -> Result<RoundSnapshot> {
        let machine = RoundMachine::with_rng(self.setup, self.rng.fork(), self.next_generation)?;
        self.next_generation = machine.generation() + 1;
        let snapshot = machine.snapshot();
        self.round = Some(machine);
        Ok(snapshot)
    }

    /// A player tapped a cup. `None` when no round is running.
    pub fn tap_cup(&mut self, slot: usize) -> Option<GuessOutcome> {
        self.round.as_mut().map(|round| round.tap_cup(slot))
    }

    /// Deal a fresh round with the same setup.
    pub fn restart(&mut self) -> Result<RoundSnapshot> {
        match self.round.as_mut() {
            Some(round) => {
                let snapshot = round.restart();
                self.next_generation = round.generation() + 1;
                Ok(snapshot)
            }
            None => self.start_round(),
        }
    }

    /// Leave the round and return to the setup screen.
    pub fn back_to_setup(&mut self) {
        if let Some(round) = self.round.take() {
            log::debug!("round {} discarded", round.generation());
        }
    }

    /// Move the clock forward. Empty when no round is running.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<RoundSnapshot> {
        self.round
            .as_mut()
            .map(|round| round.advance(elapsed_ms))
            .unwrap_or_default()
    }
}
