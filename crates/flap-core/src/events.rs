#![forbid(unsafe_code)]

//! Animator milestone events.
//!
//! Animators queue an [`AnimatorEvent`] at every lifecycle milestone and the
//! host drains them with `drain_events`. This is the polled counterpart to
//! snapshot subscribers: no closures, so it fits update loops that want to
//! react to "cell 3 settled" without owning callbacks.
//!
//! # Invariants
//!
//! 1. Events are queued in the order the milestones happen.
//! 2. Draining clears the queue; events are not replayed.
//! 3. `Settled` is queued once per completed transition.
//! 4. Disposal clears the queue and nothing is queued afterwards.

use std::time::Duration;

use crate::alphabet::Glyph;

/// A milestone in a cell's animation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// A transition began from `from` toward `to` through `steps` flips.
    TransitionStarted {
        /// Glyph shown when the transition started.
        from: Glyph,
        /// Target glyph.
        to: Glyph,
        /// Number of flips to reach `to`.
        steps: usize,
    },
    /// A new target replaced an in-flight transition at virtual time `at`.
    Preempted {
        /// Clock reading of the preemption.
        at: Duration,
    },
    /// The target was reached without animating.
    Snapped {
        /// Glyph now shown.
        to: Glyph,
    },
    /// The cell finished its transition and is resting.
    Settled {
        /// Glyph now shown.
        glyph: Glyph,
    },
    /// The alphabet changed and the cell restarted from its first glyph.
    Reset,
}

/// FIFO of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<AnimatorEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn push(&mut self, event: AnimatorEvent) {
        self.events.push(event);
    }

    /// Take every pending event.
    pub fn drain(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_clears() {
        let mut queue = EventQueue::new();
        queue.push(AnimatorEvent::Reset);
        queue.push(AnimatorEvent::Settled { glyph: "A".into() });
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert_eq!(
            events,
            vec![
                AnimatorEvent::Reset,
                AnimatorEvent::Settled { glyph: "A".into() }
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
