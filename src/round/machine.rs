//! The timed round machine.
//!
//! `RoundMachine` pairs a `RoundState` with the `Timeline` of steps still to
//! run. Taps are applied immediately; everything else (ending the token
//! display, each shuffle step, resolving a miss) is queued with a delay and
//! applied as the host advances the clock.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, GuessOutcome, Phase, RoundConfig, RoundSnapshot, RoundState};
use crate::error::{Result, ShellGameError};
use crate::rules::MissPolicy;
use crate::schedule::Timeline;
use crate::shuffle::{ShuffleSequencer, ShuffleStep};

/// A delayed transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundAction {
    /// Cover the cups and plan a shuffle.
    BeginShuffle,
    /// Apply one shuffle step.
    Shuffle(ShuffleStep),
    /// Hand the turn to the current player.
    FinishShuffle,
    /// Clear the miss on `slot` and apply the rule set's consequence.
    ResolveMiss { slot: usize },
}

/// One round and its pending steps.
#[derive(Clone, Debug)]
pub struct RoundMachine {
    config: RoundConfig,
    rng: GameRng,
    sequencer: ShuffleSequencer,
    state: RoundState,
    timeline: Timeline<RoundAction>,
}

impl RoundMachine {
    /// Start a round with a seeded RNG.
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, GameRng::new(seed), 0)
    }

    /// Start a round drawing from `rng`, numbering it `generation`.
    pub fn with_rng(config: RoundConfig, mut rng: GameRng, generation: u64) -> Result<Self> {
        config.validate()?;
        let state = RoundState::new(config, &mut rng, generation);
        Ok(Self::start(config, rng, state))
    }

    /// Start a round with the token under a known slot.
    pub fn with_token(config: RoundConfig, token_slot: usize, seed: u64) -> Result<Self> {
        config.validate()?;
        if token_slot >= config.cups() {
            return Err(ShellGameError::InvalidTokenSlot {
                slot: token_slot,
                cup_count: config.cups(),
            });
        }
        let state = RoundState::with_token(config, token_slot, 0);
        Ok(Self::start(config, GameRng::new(seed), state))
    }

    fn start(config: RoundConfig, rng: GameRng, state: RoundState) -> Self {
        let mut timeline = Timeline::with_generation(state.generation());
        timeline.schedule(config.timing.show_token_ms, RoundAction::BeginShuffle);
        log::debug!(
            "round {} started: {} players, {} {} cups",
            state.generation(),
            config.player_count,
            config.cup_count,
            config.rules
        );

        Self {
            config,
            rng,
            sequencer: ShuffleSequencer::from_config(&config),
            state,
            timeline,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.timeline.generation()
    }

    /// Render data for the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        self.state.snapshot()
    }

    /// Whether no steps are pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Milliseconds until the next pending step, if any.
    #[must_use]
    pub fn next_step_in_ms(&self) -> Option<u64> {
        self.timeline.next_due_in_ms()
    }

    // === Intents ===

    /// A player tapped the cup in `slot`.
    ///
    /// Taps outside `Playing`, on a resolved cup, or past the last slot are
    /// ignored.
    pub fn tap_cup(&mut self, slot: usize) -> GuessOutcome {
        let (next, outcome) = self.state.guess(slot);
        match outcome {
            GuessOutcome::Found { player, slot } => {
                log::debug!("round {}: {player} found the token under slot {slot}", self.generation());
            }
            GuessOutcome::Missed { player, slot } => {
                log::debug!("round {}: {player} missed with slot {slot}", self.generation());
                self.timeline
                    .schedule(self.config.timing.miss_display_ms, RoundAction::ResolveMiss { slot });
            }
            GuessOutcome::Ignored(reason) => {
                log::debug!("round {}: tap on slot {slot} ignored: {reason:?}", self.generation());
            }
        }
        self.state = next;
        outcome
    }

    /// Throw this round away and deal a fresh one with the same config.
    pub fn restart(&mut self) -> RoundSnapshot {
        let generation = self.timeline.reset();
        self.state = RoundState::new(self.config, &mut self.rng, generation);
        self.timeline.schedule(self.config.timing.show_token_ms, RoundAction::BeginShuffle);
        log::debug!("round restarted as generation {generation}");
        self.snapshot()
    }

    // === Clock ===

    /// Move the clock forward, applying every step that falls due.
    ///
    /// Returns one snapshot per applied step, in order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<RoundSnapshot> {
        self.timeline.tick(elapsed_ms);
        let mut snapshots = Vec::new();
        while let Some(entry) = self.timeline.pop_due() {
            self.apply(entry.action);
            snapshots.push(self.snapshot());
        }
        self.timeline.settle();
        snapshots
    }

    /// Advance until no steps are pending.
    pub fn run_until_idle(&mut self) -> Vec<RoundSnapshot> {
        let mut snapshots = Vec::new();
        while let Some(wait) = self.timeline.next_due_in_ms() {
            snapshots.extend(self.advance(wait));
        }
        snapshots
    }

    fn apply(&mut self, action: RoundAction) {
        let before = self.state.phase();
        let next = match action {
            RoundAction::BeginShuffle => self.begin_shuffle(),
            RoundAction::Shuffle(step) => {
                log::trace!("round {}: {step:?}", self.generation());
                self.state.apply_shuffle_step(&step)
            }
            RoundAction::FinishShuffle => self.state.finish_shuffle(),
            RoundAction::ResolveMiss { slot } => self.resolve_miss(slot),
        };
        if next.phase() != before {
            log::debug!("round {}: {before:?} -> {:?}", self.generation(), next.phase());
        }
        self.state = next;
    }

    fn begin_shuffle(&mut self) -> RoundState {
        let next = self.state.begin_shuffle();
        if next.phase() != Phase::Shuffling {
            return next;
        }

        let timing = self.config.timing;
        let plan = self.sequencer.plan(&next, &mut self.rng);
        for timed in plan.timed_steps(&timing) {
            self.timeline.schedule(timed.delay_ms, RoundAction::Shuffle(timed.step));
        }
        self.timeline.schedule(plan.finish_delay_ms(&timing), RoundAction::FinishShuffle);
        next
    }

    fn resolve_miss(&mut self, slot: usize) -> RoundState {
        let mut next = self.state.resolve_miss(slot);
        if next == self.state {
            return next;
        }
        if self.config.rehide_on_miss && self.config.rules.miss_policy() == MissPolicy::ResetAll {
            next = next.rehide_token(&mut self.rng);
        }
        self.timeline
            .schedule(self.config.timing.reshuffle_delay_ms(), RoundAction::BeginShuffle);
        next
    }
}
