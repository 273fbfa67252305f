//! Random swap planning and step timing.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameRng, RoundConfig, RoundState, Timing};

use super::ShuffleStep;

/// A shuffle step with the delay to wait before applying it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedStep {
    /// Milliseconds after the previous step.
    pub delay_ms: u64,
    pub step: ShuffleStep,
}

/// The slot pairs one shuffle will swap, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShufflePlan {
    pairs: SmallVec<[(usize, usize); 4]>,
}

impl ShufflePlan {
    /// A plan swapping the given pairs in order.
    #[must_use]
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        Self {
            pairs: SmallVec::from_slice(pairs),
        }
    }

    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every step in order, each with the delay before it.
    ///
    /// The first lift waits `cover_ms` after the cups are covered; later
    /// rounds start `land_ms` after the previous landing.
    #[must_use]
    pub fn timed_steps(&self, timing: &Timing) -> Vec<TimedStep> {
        let mut steps = Vec::with_capacity(self.pairs.len() * 4);
        for (round, &(a, b)) in self.pairs.iter().enumerate() {
            let lead_in = if round == 0 { timing.cover_ms } else { timing.land_ms };
            let delays = [lead_in, timing.lift_ms, timing.lift_ms, timing.cross_ms];
            for (delay_ms, step) in delays.into_iter().zip(ShuffleStep::swap_round(a, b)) {
                steps.push(TimedStep { delay_ms, step });
            }
        }
        steps
    }

    /// Delay between the last step and play resuming.
    #[must_use]
    pub fn finish_delay_ms(&self, timing: &Timing) -> u64 {
        if self.is_empty() {
            timing.cover_ms
        } else {
            timing.land_ms
        }
    }

    /// Where each cup ends up: `result[slot]` is the slot the cup now in
    /// `slot` started the shuffle in.
    #[must_use]
    pub fn permutation(&self, cup_count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..cup_count).collect();
        for &(a, b) in &self.pairs {
            order.swap(a, b);
        }
        order
    }
}

/// Plans shuffles of a fixed number of swap rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleSequencer {
    rounds: u8,
}

impl ShuffleSequencer {
    /// A sequencer running `rounds` swaps per shuffle (at least 1).
    #[must_use]
    pub fn new(rounds: u8) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    /// A sequencer using the round's configured length.
    #[must_use]
    pub fn from_config(config: &RoundConfig) -> Self {
        Self::new(config.shuffle_rounds)
    }

    #[must_use]
    pub fn rounds(&self) -> u8 {
        self.rounds
    }

    /// Choose the swap pairs for one shuffle of `state`.
    ///
    /// Only in-play slots are picked, so removed cups stay put. With fewer
    /// than two in-play cups the plan is empty.
    pub fn plan(&self, state: &RoundState, rng: &mut GameRng) -> ShufflePlan {
        let candidates = state.in_play_slots();
        let mut pairs = SmallVec::new();
        for _ in 0..self.rounds {
            match rng.distinct_pair_from(&candidates) {
                Some(pair) => pairs.push(pair),
                None => break,
            }
        }
        log::trace!("planned {} swaps over {} cups", pairs.len(), candidates.len());
        ShufflePlan { pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;

    #[test]
    fn test_plan_length_and_distinct() {
        let state = RoundState::with_token(RoundConfig::new(1, 3), 0, 0);
        let mut rng = GameRng::new(42);
        let plan = ShuffleSequencer::new(4).plan(&state, &mut rng);

        assert_eq!(plan.len(), 4);
        for &(a, b) in plan.pairs() {
            assert_ne!(a, b);
            assert!(a < 3 && b < 3);
        }
    }

    #[test]
    fn test_zero_rounds_becomes_one() {
        assert_eq!(ShuffleSequencer::new(0).rounds(), 1);
    }

    #[test]
    fn test_plan_skips_removed_cups() {
        let config = RoundConfig::for_rules(Rules::Pyramid).with_cups(3);
        let state = RoundState::with_token(config, 0, 0).begin_shuffle().finish_shuffle();
        let (state, _) = state.guess(1);
        let state = state.resolve_miss(1);

        let mut rng = GameRng::new(8);
        let plan = ShuffleSequencer::new(10).plan(&state, &mut rng);
        assert_eq!(plan.len(), 10);
        for &(a, b) in plan.pairs() {
            assert!(a != 1 && b != 1);
        }
    }

    #[test]
    fn test_plan_empty_with_single_cup_left() {
        let config = RoundConfig::for_rules(Rules::Pyramid).with_cups(2);
        let state = RoundState::with_token(config, 0, 0).begin_shuffle().finish_shuffle();
        let (state, _) = state.guess(1);
        let state = state.resolve_miss(1);

        let plan = ShuffleSequencer::new(4).plan(&state, &mut GameRng::new(1));
        assert!(plan.is_empty());
        assert_eq!(plan.finish_delay_ms(&Timing::default()), Timing::default().cover_ms);
    }

    #[test]
    fn test_timed_steps_match_timing() {
        let timing = Timing::default();
        let plan = ShufflePlan::from_pairs(&[(0, 1), (1, 2)]);
        let steps = plan.timed_steps(&timing);

        assert_eq!(steps.len(), 8);
        let delays: Vec<_> = steps.iter().map(|s| s.delay_ms).collect();
        assert_eq!(delays, vec![300, 60, 60, 80, 120, 60, 60, 80]);
        assert_eq!(steps[4].step, ShuffleStep::Lift { slot: 1 });

        let total: u64 = delays.iter().sum::<u64>() + plan.finish_delay_ms(&timing);
        assert_eq!(total, timing.shuffle_duration_ms(2));
    }

    #[test]
    fn test_permutation() {
        let plan = ShufflePlan::from_pairs(&[(0, 1), (1, 2)]);
        assert_eq!(plan.permutation(3), vec![1, 2, 0]);
        assert_eq!(ShufflePlan::default().permutation(3), vec![0, 1, 2]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let state = RoundState::with_token(RoundConfig::new(1, 5), 0, 0);
        let a = ShuffleSequencer::new(4).plan(&state, &mut GameRng::new(11));
        let b = ShuffleSequencer::new(4).plan(&state, &mut GameRng::new(11));
        assert_eq!(a, b);
    }
}
