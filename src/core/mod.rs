//! Core round types: players, cups, configuration, RNG, state, snapshots.
//!
//! Nothing in here knows about time. The scheduler in `schedule` and the
//! machine in `round` decide when each transition runs.

pub mod config;
pub mod cup;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use config::{RoundConfig, Timing, DEFAULT_SHUFFLE_ROUNDS, MAX_CUPS, MIN_CUPS, MIN_PLAYERS};
pub use cup::{Cup, Position, LIFT_HEIGHT};
pub use player::PlayerId;
pub use rng::GameRng;
pub use snapshot::{CupView, RoundSnapshot};
pub use state::{GuessOutcome, IgnoreReason, Phase, RoundState};
