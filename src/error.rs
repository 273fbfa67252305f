//! Error types for fallible construction and snapshot codecs.
//!
//! Gameplay itself never fails: stale or out-of-range intents are ignored
//! and reported through [`crate::core::IgnoreReason`] instead.

use thiserror::Error;

/// Errors raised when building a configuration or decoding a snapshot.
#[derive(Error, Debug)]
pub enum ShellGameError {
    #[error("player count must be between 1 and 255, got {0}")]
    InvalidPlayerCount(u32),

    #[error("cup count must be between 2 and 15, got {0}")]
    InvalidCupCount(u32),

    #[error("a shuffle needs at least one round")]
    InvalidShuffleRounds,

    #[error("token slot {slot} is outside {cup_count} cups")]
    InvalidTokenSlot { slot: usize, cup_count: usize },

    #[error("snapshot codec failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, ShellGameError>;
