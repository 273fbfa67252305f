//! Cooperative step scheduling on a logical clock.
//!
//! Rounds are paced by delays: the token stays visible for a moment before
//! the cups cover it, and a miss lingers before the table resets. Rather than
//! spawning timers, every pending step goes into a [`Timeline`]:
//! an ordered queue of `(action, delay_ms)` entries consumed as the host
//! advances the clock.
//!
//! ## Ordering
//!
//! - Steps run strictly in the order they were scheduled
//! - Each delay counts from the previous step, not from when it was queued
//! - Leftover time carries into steps queued while draining
//!
//! ## Stale steps
//!
//! Each entry records the timeline generation it was queued under. `reset`
//! bumps the generation and clears the queue, and any entry from an older
//! generation that still reaches `pop_due` is discarded.

mod queue;

pub use queue::{Scheduled, Timeline};
