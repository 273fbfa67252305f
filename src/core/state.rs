//! Round state and its transitions.
//!
//! ## RoundState
//!
//! Everything a round needs between two scheduled steps:
//! - Phase and whose turn it is
//! - The cups, indexed by slot, with the token under exactly one
//! - Where each slot's cup is currently drawn, and where slots rest
//!
//! Every transition takes `&self` and returns a new state. The cup and
//! position vectors are `im` persistent vectors, so keeping the previous
//! state around (for a snapshot, or a stale-callback check) costs O(1).
//!
//! Transitions that do not apply to the current phase return an unchanged
//! copy: stale input is ignored, never an error.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::RoundConfig;
use super::cup::{Cup, Position};
use super::player::PlayerId;
use super::rng::GameRng;
use super::snapshot::{CupView, RoundSnapshot};
use crate::rules::{slot_layout, MissPolicy, Rules};
use crate::shuffle::ShuffleStep;

/// Lifecycle stage of a round.
///
/// `ShowingToken -> Shuffling -> Playing -> (Shuffling <-> Playing)* -> RoundOver`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The token is visible so players can note where it starts.
    ShowingToken,
    /// Cups are covered and moving; also covers a miss being displayed.
    Shuffling,
    /// Waiting for the current player to pick a cup.
    Playing,
    /// The token was found. Terminal.
    RoundOver,
}

impl Phase {
    /// Whether the round has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::RoundOver)
    }

    /// Whether a guess can be made.
    #[must_use]
    pub const fn accepts_guesses(self) -> bool {
        matches!(self, Phase::Playing)
    }
}

/// Why a guess was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Guesses are only taken while playing.
    NotPlaying(Phase),
    /// No cup at that slot.
    OutOfRange { slot: usize, cup_count: usize },
    /// The cup was already revealed or removed.
    AlreadyResolved(usize),
}

/// Result of a guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessOutcome {
    /// The token was under the chosen cup; the round is over.
    Found { player: PlayerId, slot: usize },
    /// Wrong cup; the miss is displayed and then resolved.
    Missed { player: PlayerId, slot: usize },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl GuessOutcome {
    /// Whether the guess changed the round.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, GuessOutcome::Ignored(_))
    }
}

/// State of one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Which round of the owning machine this is.
    generation: u64,

    config: RoundConfig,

    /// Cups by slot.
    cups: Vector<Cup>,

    /// Where the cup in each slot is drawn right now.
    positions: Vector<Position>,

    /// Resting position of each slot.
    slots: Vector<Position>,

    current_player: PlayerId,

    phase: Phase,

    winner_message: Option<String>,
}

impl RoundState {
    /// Start a round: hide the token under a uniformly random cup and show it.
    #[must_use]
    pub fn new(config: RoundConfig, rng: &mut GameRng, generation: u64) -> Self {
        let token = rng.gen_index(config.cups());
        Self::with_token(config, token, generation)
    }

    /// Start a round with the token under a known slot.
    ///
    /// # Panics
    ///
    /// Panics if `token_slot` is not a slot of `config`.
    #[must_use]
    pub fn with_token(config: RoundConfig, token_slot: usize, generation: u64) -> Self {
        assert!(
            token_slot < config.cups(),
            "token slot {token_slot} outside {} cups",
            config.cups()
        );

        let slots: Vector<Position> = slot_layout(config.rules, config.cups()).into_iter().collect();
        let cups = (0..config.cups())
            .map(|i| Cup::new(i, i == token_slot))
            .collect();

        Self {
            generation,
            config,
            cups,
            positions: slots.clone(),
            slots,
            current_player: PlayerId::FIRST,
            phase: Phase::ShowingToken,
            winner_message: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> Rules {
        self.config.rules
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn winner_message(&self) -> Option<&str> {
        self.winner_message.as_deref()
    }

    /// Cups by slot.
    #[must_use]
    pub fn cups(&self) -> &Vector<Cup> {
        &self.cups
    }

    /// The cup in `slot`, if any.
    #[must_use]
    pub fn cup(&self, slot: usize) -> Option<&Cup> {
        self.cups.get(slot)
    }

    /// Current drawing position of each slot's cup.
    #[must_use]
    pub fn positions(&self) -> &Vector<Position> {
        &self.positions
    }

    /// Resting position of each slot.
    #[must_use]
    pub fn slots(&self) -> &Vector<Position> {
        &self.slots
    }

    /// Slot currently holding the token.
    #[must_use]
    pub fn token_slot(&self) -> usize {
        self.cups
            .iter()
            .position(|cup| cup.has_token)
            .unwrap_or_default()
    }

    /// Slots whose cups can still be guessed or shuffled.
    #[must_use]
    pub fn in_play_slots(&self) -> Vec<usize> {
        self.cups
            .iter()
            .enumerate()
            .filter(|(_, cup)| cup.is_in_play())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Whether a miss is currently on display.
    #[must_use]
    pub fn miss_pending(&self) -> bool {
        self.cups.iter().any(|cup| cup.miss)
    }

    // === Transitions ===

    /// Cover every cup and start shuffling.
    ///
    /// Clears reveal and miss flags. Removal is cleared too unless the rule
    /// set makes it permanent.
    #[must_use]
    pub fn begin_shuffle(&self) -> Self {
        if self.phase.is_terminal() {
            return self.clone();
        }

        let mut next = self.clone();
        let keep_removed = self.rules().removal_is_permanent();
        for cup in next.cups.iter_mut() {
            *cup = Cup {
                removed: cup.removed && keep_removed,
                ..cup.covered()
            };
        }
        next.positions = next.slots.clone();
        next.phase = Phase::Shuffling;
        next
    }

    /// Apply one step of a shuffle plan.
    ///
    /// Ignored outside `Shuffling` or for slots not on the table.
    #[must_use]
    pub fn apply_shuffle_step(&self, step: &ShuffleStep) -> Self {
        if self.phase != Phase::Shuffling {
            return self.clone();
        }
        if !step.slots().iter().all(|&slot| slot < self.cups.len()) {
            log::warn!("shuffle step {step:?} outside {} cups, skipped", self.cups.len());
            return self.clone();
        }

        let mut next = self.clone();
        match *step {
            ShuffleStep::Lift { slot } => {
                next.positions[slot] = next.positions[slot].lifted();
            }
            ShuffleStep::Cross { a, b } => {
                next.positions[a] = self.slots[b].lifted();
                next.positions[b] = self.slots[a].lifted();
            }
            ShuffleStep::Land { a, b } => {
                // The cup drawn at slot a comes down on slot b and vice versa,
                // so the cups trade slots and every position is back at rest.
                next.cups.swap(a, b);
                next.positions[a] = self.slots[a];
                next.positions[b] = self.slots[b];
            }
        }
        next
    }

    /// End the shuffle and hand the turn to the current player.
    #[must_use]
    pub fn finish_shuffle(&self) -> Self {
        if self.phase != Phase::Shuffling {
            return self.clone();
        }
        let mut next = self.clone();
        next.positions = next.slots.clone();
        next.phase = Phase::Playing;
        next
    }

    /// Guess that the token is under the cup in `slot`.
    #[must_use]
    pub fn guess(&self, slot: usize) -> (Self, GuessOutcome) {
        if !self.phase.accepts_guesses() {
            return (self.clone(), GuessOutcome::Ignored(IgnoreReason::NotPlaying(self.phase)));
        }
        let Some(cup) = self.cups.get(slot).copied() else {
            let reason = IgnoreReason::OutOfRange {
                slot,
                cup_count: self.cups.len(),
            };
            return (self.clone(), GuessOutcome::Ignored(reason));
        };
        if !cup.is_in_play() {
            return (self.clone(), GuessOutcome::Ignored(IgnoreReason::AlreadyResolved(slot)));
        }

        let player = self.current_player;
        let mut next = self.clone();
        if cup.has_token {
            next.cups[slot].revealed = true;
            next.winner_message = Some(self.winner_text());
            next.phase = Phase::RoundOver;
            (next, GuessOutcome::Found { player, slot })
        } else {
            next.cups[slot].miss = true;
            // Leaving Playing blocks further taps until the miss resolves.
            next.phase = Phase::Shuffling;
            (next, GuessOutcome::Missed { player, slot })
        }
    }

    /// Clear a displayed miss, apply the rule set's consequence, and pass
    /// the turn.
    #[must_use]
    pub fn resolve_miss(&self, slot: usize) -> Self {
        if self.phase != Phase::Shuffling || !self.cups.get(slot).is_some_and(|cup| cup.miss) {
            return self.clone();
        }

        let mut next = self.clone();
        for cup in next.cups.iter_mut() {
            cup.miss = false;
        }
        match self.rules().miss_policy() {
            MissPolicy::Remove => {
                next.cups[slot].removed = true;
            }
            MissPolicy::ResetAll => {
                for cup in next.cups.iter_mut() {
                    *cup = Cup {
                        removed: false,
                        ..cup.covered()
                    };
                }
            }
        }
        if self.config.is_multiplayer() {
            next.current_player = self.current_player.next(self.config.player_count);
        }
        next
    }

    /// Move the token under a uniformly random in-play cup.
    #[must_use]
    pub fn rehide_token(&self, rng: &mut GameRng) -> Self {
        if self.phase.is_terminal() {
            return self.clone();
        }
        let Some(target) = rng.choose_from(&self.in_play_slots()) else {
            return self.clone();
        };

        let mut next = self.clone();
        for (slot, cup) in next.cups.iter_mut().enumerate() {
            cup.has_token = slot == target;
        }
        next
    }

    /// Render data for the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        let showing_token = self.phase == Phase::ShowingToken;
        let cups = self
            .cups
            .iter()
            .zip(self.positions.iter())
            .map(|(cup, &position)| CupView {
                index: cup.index,
                position,
                shows_token: cup.has_token && (showing_token || cup.revealed),
                open: cup.is_open() || (cup.has_token && showing_token),
                miss: cup.miss,
                removed: cup.removed,
            })
            .collect();

        RoundSnapshot {
            generation: self.generation,
            phase: self.phase,
            rules: self.rules(),
            current_player: self.current_player,
            player_count: self.config.player_count,
            cups,
            winner_message: self.winner_message.clone(),
        }
    }

    fn winner_text(&self) -> String {
        if self.config.is_multiplayer() {
            format!("{} wins!", self.current_player)
        } else {
            "Found the ball!".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: u32, cups: u32) -> RoundConfig {
        RoundConfig::new(players, cups)
    }

    fn playing(state: &RoundState) -> RoundState {
        state.begin_shuffle().finish_shuffle()
    }

    fn token_count(state: &RoundState) -> usize {
        state.cups().iter().filter(|c| c.has_token).count()
    }

    #[test]
    fn test_new_round() {
        let mut rng = GameRng::new(42);
        let state = RoundState::new(config(2, 3), &mut rng, 0);

        assert_eq!(state.phase(), Phase::ShowingToken);
        assert_eq!(state.current_player(), PlayerId::FIRST);
        assert_eq!(state.cups().len(), 3);
        assert_eq!(state.positions().len(), 3);
        assert_eq!(token_count(&state), 1);
        assert!(state.cups().iter().all(|c| c.is_in_play() && !c.miss));
        assert_eq!(state.positions()[1], Position::new(1.0, 0.0));
        assert!(state.winner_message().is_none());
    }

    #[test]
    fn test_new_round_token_is_spread() {
        let mut rng = GameRng::new(1);
        let mut seen = [false; 4];
        for _ in 0..100 {
            seen[RoundState::new(config(1, 4), &mut rng, 0).token_slot()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "outside 3 cups")]
    fn test_with_token_out_of_range() {
        let _ = RoundState::with_token(config(1, 3), 3, 0);
    }

    #[test]
    fn test_begin_shuffle_covers() {
        let state = RoundState::with_token(config(1, 3), 1, 0);
        let shuffling = state.begin_shuffle();

        assert_eq!(shuffling.phase(), Phase::Shuffling);
        // The original is untouched.
        assert_eq!(state.phase(), Phase::ShowingToken);
    }

    #[test]
    fn test_correct_guess_ends_round() {
        let state = playing(&RoundState::with_token(config(1, 3), 1, 0));
        let (next, outcome) = state.guess(1);

        assert_eq!(outcome, GuessOutcome::Found { player: PlayerId::FIRST, slot: 1 });
        assert_eq!(next.phase(), Phase::RoundOver);
        assert!(next.cup(1).unwrap().revealed);
        assert_eq!(next.winner_message(), Some("Found the ball!"));
    }

    #[test]
    fn test_multiplayer_winner_message() {
        let state = playing(&RoundState::with_token(config(3, 3), 0, 0));
        let (state, _) = state.guess(1);
        let state = playing(&state.resolve_miss(1));
        let (state, outcome) = state.guess(0);

        assert!(matches!(outcome, GuessOutcome::Found { slot: 0, .. }));
        assert_eq!(state.winner_message(), Some("Player 2 wins!"));
    }

    #[test]
    fn test_round_over_is_frozen() {
        let state = playing(&RoundState::with_token(config(2, 3), 1, 0));
        let (over, _) = state.guess(1);

        let (after, outcome) = over.guess(0);
        assert_eq!(outcome, GuessOutcome::Ignored(IgnoreReason::NotPlaying(Phase::RoundOver)));
        assert_eq!(after, over);
        assert_eq!(over.begin_shuffle(), over);
        assert_eq!(over.finish_shuffle(), over);
        assert_eq!(over.apply_shuffle_step(&ShuffleStep::Land { a: 0, b: 1 }), over);
        assert_eq!(over.rehide_token(&mut GameRng::new(1)), over);
    }

    #[test]
    fn test_wrong_guess_blocks_until_resolved() {
        let state = playing(&RoundState::with_token(config(2, 3), 1, 0));
        let (missed, outcome) = state.guess(0);

        assert_eq!(outcome, GuessOutcome::Missed { player: PlayerId::FIRST, slot: 0 });
        assert!(missed.cup(0).unwrap().miss);
        assert!(missed.miss_pending());
        assert_eq!(missed.phase(), Phase::Shuffling);

        let (same, outcome) = missed.guess(1);
        assert!(!outcome.is_accepted());
        assert_eq!(same, missed);
    }

    #[test]
    fn test_classic_miss_resets_and_rotates() {
        let state = playing(&RoundState::with_token(config(2, 3), 1, 0));
        let (missed, _) = state.guess(0);
        let resolved = missed.resolve_miss(0);

        assert!(!resolved.miss_pending());
        assert!(resolved.cups().iter().all(|c| c.is_in_play()));
        assert_eq!(resolved.current_player(), PlayerId::new(2).unwrap());
        assert_eq!(resolved.token_slot(), 1);
    }

    #[test]
    fn test_single_player_never_rotates() {
        let state = playing(&RoundState::with_token(config(1, 3), 2, 0));
        let (missed, _) = state.guess(0);
        let resolved = missed.resolve_miss(0);
        assert_eq!(resolved.current_player(), PlayerId::FIRST);
    }

    #[test]
    fn test_pyramid_miss_removes_cup() {
        let cfg = RoundConfig::for_rules(Rules::Pyramid);
        let state = playing(&RoundState::with_token(cfg, 4, 0));
        let (missed, _) = state.guess(2);
        let resolved = missed.resolve_miss(2);

        assert!(resolved.cup(2).unwrap().removed);
        assert!(!resolved.miss_pending());

        // Removal survives the next shuffle and the cup cannot be guessed.
        let replaying = playing(&resolved);
        assert!(replaying.cup(2).unwrap().removed);
        let (_, outcome) = replaying.guess(2);
        assert_eq!(outcome, GuessOutcome::Ignored(IgnoreReason::AlreadyResolved(2)));
        assert!(!replaying.in_play_slots().contains(&2));
    }

    #[test]
    fn test_resolve_miss_requires_flag() {
        let state = playing(&RoundState::with_token(config(2, 3), 1, 0));
        let (missed, _) = state.guess(0);
        assert_eq!(missed.resolve_miss(2), missed);
        assert_eq!(state.resolve_miss(0), state);
    }

    #[test]
    fn test_guess_out_of_range() {
        let state = playing(&RoundState::with_token(config(1, 3), 1, 0));
        let (_, outcome) = state.guess(7);
        assert_eq!(
            outcome,
            GuessOutcome::Ignored(IgnoreReason::OutOfRange { slot: 7, cup_count: 3 })
        );
    }

    #[test]
    fn test_guess_before_playing() {
        let state = RoundState::with_token(config(1, 3), 1, 0);
        let (_, outcome) = state.guess(1);
        assert_eq!(outcome, GuessOutcome::Ignored(IgnoreReason::NotPlaying(Phase::ShowingToken)));
    }

    #[test]
    fn test_shuffle_steps_move_identity_with_position() {
        let state = RoundState::with_token(config(1, 3), 0, 0).begin_shuffle();
        let slots = state.slots().clone();

        let state = state.apply_shuffle_step(&ShuffleStep::Lift { slot: 0 });
        assert_eq!(state.positions()[0], slots[0].lifted());
        let state = state.apply_shuffle_step(&ShuffleStep::Lift { slot: 2 });
        let state = state.apply_shuffle_step(&ShuffleStep::Cross { a: 0, b: 2 });

        // The token cup is still in entry 0 but drawn over slot 2.
        assert!(state.cup(0).unwrap().has_token);
        assert_eq!(state.positions()[0], slots[2].lifted());
        assert_eq!(state.positions()[2], slots[0].lifted());

        let state = state.apply_shuffle_step(&ShuffleStep::Land { a: 0, b: 2 });
        assert_eq!(state.token_slot(), 2);
        assert_eq!(state.cup(2).unwrap().index, 0);
        assert_eq!(state.positions(), state.slots());
        assert_eq!(token_count(&state), 1);
    }

    #[test]
    fn test_shuffle_step_outside_shuffling_is_ignored() {
        let state = RoundState::with_token(config(1, 3), 0, 0);
        assert_eq!(state.apply_shuffle_step(&ShuffleStep::Land { a: 0, b: 1 }), state);
    }

    #[test]
    fn test_shuffle_step_out_of_range_is_ignored() {
        let state = RoundState::with_token(config(1, 3), 0, 0).begin_shuffle();
        assert_eq!(state.apply_shuffle_step(&ShuffleStep::Cross { a: 0, b: 9 }), state);
    }

    #[test]
    fn test_rehide_keeps_single_token() {
        let mut rng = GameRng::new(5);
        let mut state = RoundState::with_token(config(1, 5), 0, 0).begin_shuffle();
        for _ in 0..20 {
            state = state.rehide_token(&mut rng);
            assert_eq!(token_count(&state), 1);
        }
    }

    #[test]
    fn test_snapshot_hides_token_while_covered() {
        let state = RoundState::with_token(config(1, 3), 1, 3);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.generation, 3);
        assert!(snapshot.cups[1].shows_token);
        assert!(snapshot.cups[1].open);

        let snapshot = playing(&state).snapshot();
        assert!(snapshot.cups.iter().all(|c| !c.shows_token && !c.open));
    }

    #[test]
    fn test_state_serialization() {
        let state = RoundState::with_token(config(2, 4), 3, 1);
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
