//! The timeline queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// An action waiting on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled<A> {
    /// Generation the action was queued under.
    pub generation: u64,
    /// Milliseconds after the previous entry.
    pub delay_ms: u64,
    pub action: A,
}

/// Ordered queue of delayed actions on a single logical clock.
///
/// ```
/// use shell_game::schedule::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.schedule(100, "cover");
/// timeline.schedule(50, "lift");
///
/// timeline.tick(120);
/// assert_eq!(timeline.pop_due().map(|s| s.action), Some("cover"));
/// assert!(timeline.pop_due().is_none());
///
/// timeline.tick(30);
/// assert_eq!(timeline.pop_due().map(|s| s.action), Some("lift"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timeline<A> {
    queue: VecDeque<Scheduled<A>>,
    generation: u64,
    /// Time elapsed since the last entry fired, not yet spent.
    banked_ms: u64,
    /// Total time the clock has advanced.
    now_ms: u64,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timeline<A> {
    /// An empty timeline at generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            generation: 0,
            banked_ms: 0,
            now_ms: 0,
        }
    }

    /// An empty timeline starting at `generation`.
    #[must_use]
    pub fn with_generation(generation: u64) -> Self {
        Self {
            generation,
            ..Self::new()
        }
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total milliseconds the clock has advanced.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Milliseconds until the next entry is due, if any.
    #[must_use]
    pub fn next_due_in_ms(&self) -> Option<u64> {
        self.queue
            .front()
            .map(|next| next.delay_ms.saturating_sub(self.banked_ms))
    }

    /// Sum of all remaining delays: how long until the queue drains.
    #[must_use]
    pub fn remaining_ms(&self) -> u64 {
        let total: u64 = self.queue.iter().map(|entry| entry.delay_ms).sum();
        total.saturating_sub(self.banked_ms)
    }

    /// Queue `action` to run `delay_ms` after the previous entry.
    pub fn schedule(&mut self, delay_ms: u64, action: A) {
        self.queue.push_back(Scheduled {
            generation: self.generation,
            delay_ms,
            action,
        });
    }

    /// Queue a pre-built entry, keeping its recorded generation.
    pub fn push(&mut self, entry: Scheduled<A>) {
        self.queue.push_back(entry);
    }

    /// Advance the clock.
    ///
    /// Time passing with nothing queued is not banked.
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        if !self.queue.is_empty() {
            self.banked_ms = self.banked_ms.saturating_add(elapsed_ms);
        }
    }

    /// Pop the next entry if its delay has elapsed.
    ///
    /// Entries from an older generation are dropped on the way.
    pub fn pop_due(&mut self) -> Option<Scheduled<A>> {
        loop {
            let front = self.queue.front()?;
            if front.generation != self.generation {
                log::warn!(
                    "dropping step from generation {} (current {})",
                    front.generation,
                    self.generation
                );
                self.queue.pop_front();
                continue;
            }
            if front.delay_ms > self.banked_ms {
                return None;
            }
            self.banked_ms -= front.delay_ms;
            return self.queue.pop_front();
        }
    }

    /// Forget leftover time once the queue has drained, so the next entry
    /// waits its full delay.
    pub fn settle(&mut self) {
        if self.queue.is_empty() {
            self.banked_ms = 0;
        }
    }

    /// Drop every queued entry and start a new generation.
    pub fn reset(&mut self) -> u64 {
        self.queue.clear();
        self.banked_ms = 0;
        self.generation += 1;
        self.generation
    }
}
