//! Running rounds.
//!
//! - [`RoundMachine`]: one round's state plus its pending timed steps
//! - [`Session`]: setup screen state and the intents a UI raises
//!
//! ## Example
//!
//! ```
//! use shell_game::core::{GuessOutcome, Phase, RoundConfig, Timing};
//! use shell_game::round::RoundMachine;
//!
//! let config = RoundConfig::new(2, 3).with_timing(Timing::instant());
//! let mut round = RoundMachine::with_token(config, 1, 42).unwrap();
//!
//! // Token display, cover, swaps, and hand-over all fall due at once.
//! round.run_until_idle();
//! assert_eq!(round.phase(), Phase::Playing);
//!
//! let token = round.state().token_slot();
//! assert!(matches!(round.tap_cup(token), GuessOutcome::Found { .. }));
//! assert_eq!(round.phase(), Phase::RoundOver);
//! ```

mod machine;
mod session;

pub use machine::{RoundAction, RoundMachine};
pub use session::Session;
