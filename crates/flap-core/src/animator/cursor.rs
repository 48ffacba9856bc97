#![forbid(unsafe_code)]

//! Cursor animator: one glyph per tick of an interval timer.
//!
//! The cell keeps three alphabet indices. Every tick moves `previous` to
//! `current` and advances `current` by one (wrapping), until `current`
//! reaches `target`.
//!
//! States: `Unstarted` (no `current`) → `Advancing` → `Resting`, and back to
//! `Advancing` whenever the target moves away from `current`.
//!
//! # Invariants
//!
//! 1. After activation `current` is always a valid index.
//! 2. Resting ⇔ `current == target` ⇔ no live timer.
//! 3. A target change while advancing only moves `target`; the running
//!    interval redirects at its next tick.
//! 4. An alphabet change cancels the interval, returns to `Unstarted` and
//!    immediately steps to index 0.
//!
//! # Failure Modes
//!
//! - Target not in the alphabet: clamped to index 0.

use std::time::Duration;

use super::{CellAnimator, CellConfig, CellCore};
use crate::alphabet::{Alphabet, Glyph};
use crate::error::FlapError;
use crate::events::AnimatorEvent;
use crate::sequence::forward_distance;
use crate::snapshot::Snapshot;
use crate::subscribers::SubscriptionId;

/// Alphabet indices of a cursor-driven cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Glyph on the top half; `None` before activation.
    pub current: Option<usize>,
    /// Glyph one step behind; `None` until the second step.
    pub previous: Option<usize>,
    /// Index the cursor is heading for.
    pub target: usize,
}

impl Cursor {
    /// The state before activation.
    pub const UNSTARTED: Self = Self {
        current: None,
        previous: None,
        target: 0,
    };

    /// Advance one position in a ring of `len` glyphs.
    pub fn increment(&mut self, len: usize) {
        self.previous = self.current;
        self.current = Some(match self.current {
            Some(index) if index + 1 < len => index + 1,
            _ => 0,
        });
    }

    /// Whether the cursor has reached its target.
    #[must_use]
    pub fn is_resting(&self) -> bool {
        self.current == Some(self.target)
    }
}

/// Animator that steps an index [`Cursor`] on a fixed cadence.
#[derive(Debug)]
pub struct CursorAnimator {
    core: CellCore,
    cursor: Cursor,
    target_value: Glyph,
}

impl CursorAnimator {
    /// Create and activate an animator heading for `initial`.
    ///
    /// The cell starts on the alphabet's first glyph and, unless that is
    /// already the target, flips toward `initial` one step per tick.
    ///
    /// # Errors
    ///
    /// [`FlapError::ZeroStepTiming`] for a zero step timing.
    pub fn new(alphabet: Alphabet, initial: &str, config: CellConfig) -> Result<Self, FlapError> {
        let mut anim = Self {
            core: CellCore::new(alphabet, config)?,
            cursor: Cursor::UNSTARTED,
            target_value: Glyph::from(initial),
        };
        let lead_in = anim.core.config.lead_in;
        anim.activate(lead_in);
        Ok(anim)
    }

    /// The cursor indices.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn glyph(&self, index: usize) -> Glyph {
        self.core
            .alphabet
            .get(index)
            .unwrap_or_else(|| self.core.alphabet.first())
            .clone()
    }

    fn resolve_target(&self) -> usize {
        self.core.alphabet.index_of(&self.target_value).unwrap_or(0)
    }

    /// Reset to `Unstarted`, step once to index 0 and start driving.
    fn activate(&mut self, lead_in: Duration) {
        self.core.timer.cancel();
        self.cursor = Cursor::UNSTARTED;
        self.cursor.increment(self.core.alphabet.len());
        self.cursor.target = self.resolve_target();
        if !self.cursor.is_resting() {
            self.start_driver(lead_in);
        }
    }

    fn start_driver(&mut self, lead_in: Duration) {
        let timing = self.core.config.step_timing;
        let first = self.core.now + lead_in + timing;
        self.core.timer.arm_interval(first, timing);

        let from = self.cursor.current.unwrap_or(0);
        let steps = forward_distance(self.core.alphabet.len(), from, self.cursor.target);
        crate::debug!(steps, lead_in_ms = lead_in.as_millis() as u64, "cursor driver started");
        let (from, to) = (self.glyph(from), self.glyph(self.cursor.target));
        self.core
            .emit(AnimatorEvent::TransitionStarted { from, to, steps });
    }

    fn on_tick(&mut self) {
        if self.cursor.is_resting() {
            self.core.timer.cancel();
            return;
        }
        self.cursor.increment(self.core.alphabet.len());
        if self.cursor.is_resting() {
            self.core.timer.cancel();
            let glyph = self.glyph(self.cursor.target);
            crate::trace!(glyph = %glyph, "cursor settled");
            self.core.emit(AnimatorEvent::Settled { glyph });
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.core.notify(&snapshot);
    }
}

impl CellAnimator for CursorAnimator {
    fn create(alphabet: Alphabet, initial: &str, config: CellConfig) -> Result<Self, FlapError> {
        Self::new(alphabet, initial, config)
    }

    fn alphabet(&self) -> &Alphabet {
        &self.core.alphabet
    }

    fn config(&self) -> &CellConfig {
        &self.core.config
    }

    fn target(&self) -> &Glyph {
        &self.target_value
    }

    fn set_target_after(&mut self, value: &str, lead_in: Duration) {
        if self.core.disposed || *self.target_value == *value {
            return;
        }
        self.target_value = self
            .core
            .alphabet
            .lookup(value)
            .cloned()
            .unwrap_or_else(|| Glyph::from(value));
        self.cursor.target = self.resolve_target();

        if self.cursor.is_resting() {
            if self.core.timer.cancel().is_some() {
                self.core.emit(AnimatorEvent::Preempted { at: self.core.now });
            }
            let to = self.glyph(self.cursor.target);
            self.core.emit(AnimatorEvent::Snapped { to });
        } else if self.core.timer.is_armed() {
            self.core.emit(AnimatorEvent::Preempted { at: self.core.now });
        } else {
            self.start_driver(lead_in);
        }
        self.publish();
    }

    fn set_alphabet(&mut self, alphabet: Alphabet) {
        if self.core.disposed || alphabet == self.core.alphabet {
            return;
        }
        self.core.alphabet = alphabet;
        self.core.emit(AnimatorEvent::Reset);
        let lead_in = self.core.config.lead_in;
        self.activate(lead_in);
        self.publish();
    }

    fn snapshot(&self) -> Snapshot {
        let current = self.glyph(self.cursor.current.unwrap_or(0));
        let previous = self.cursor.previous.map(|index| self.glyph(index));
        let resting = self.cursor.is_resting();
        let timing = self.core.config.step_timing;
        let step_elapsed = match self.core.timer.time_until(self.core.now) {
            Some(remaining) => timing.saturating_sub(remaining),
            None => Duration::ZERO,
        };
        Snapshot {
            next: current.clone(),
            current,
            previous,
            step_elapsed,
            step_duration: if resting { Duration::ZERO } else { timing },
            resting,
        }
    }

    fn now(&self) -> Duration {
        self.core.now
    }

    fn tick(&mut self, dt: Duration) {
        if self.core.disposed {
            return;
        }
        self.core.now = self.core.now.saturating_add(dt);
        while self.core.timer.poll(self.core.now).is_some() {
            self.on_tick();
            self.publish();
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.core.timer.deadline()
    }

    fn is_resting(&self) -> bool {
        self.cursor.is_resting()
    }

    fn subscribe(&mut self, callback: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        self.core.subscribers.subscribe(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.core.subscribers.unsubscribe(id)
    }

    fn drain_events(&mut self) -> Vec<AnimatorEvent> {
        self.core.events.drain()
    }

    fn dispose(&mut self) {
        if self.core.dispose() {
            crate::trace!("cursor animator disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_30: Duration = Duration::from_millis(30);

    fn space_a_z() -> Alphabet {
        Alphabet::new([" ", "A", "Z"]).unwrap()
    }

    fn current(anim: &CursorAnimator) -> String {
        anim.snapshot().current.to_string()
    }

    #[test]
    fn increment_wraps() {
        let mut cursor = Cursor::UNSTARTED;
        cursor.increment(2);
        assert_eq!(cursor.current, Some(0));
        assert_eq!(cursor.previous, None);
        cursor.increment(2);
        cursor.increment(2);
        assert_eq!(cursor.current, Some(0));
        assert_eq!(cursor.previous, Some(1));
    }

    #[test]
    fn creation_starts_at_first_glyph() {
        let anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, " ");
        assert_eq!(snap.previous, None);
        assert!(!snap.resting);
        assert_eq!(anim.next_deadline(), Some(MS_30));
    }

    #[test]
    fn advances_one_glyph_per_tick() {
        let mut anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        anim.tick(MS_30);
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, "A");
        assert_eq!(snap.previous.as_deref(), Some(" "));
        assert!(!snap.resting);

        anim.tick(MS_30);
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, "Z");
        assert_eq!(snap.previous.as_deref(), Some("A"));
        assert!(snap.resting);
        assert!(anim.next_deadline().is_none());
    }

    #[test]
    fn missing_target_clamps_to_first() {
        let anim = CursorAnimator::new(space_a_z(), "Q", CellConfig::new(MS_30)).unwrap();
        assert!(anim.is_resting());
        assert_eq!(current(&anim), " ");
    }

    #[test]
    fn retarget_while_advancing_redirects() {
        let mut anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        anim.tick(MS_30); // at "A"
        anim.set_target(" ");
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(60)));
        anim.tick(MS_30); // "Z"
        assert!(!anim.is_resting());
        anim.tick(MS_30); // wraps to " "
        assert!(anim.is_resting());
        assert_eq!(current(&anim), " ");
    }

    #[test]
    fn retarget_to_current_stops_driver() {
        let mut anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        anim.tick(MS_30);
        anim.set_target("A");
        assert!(anim.is_resting());
        assert!(anim.next_deadline().is_none());
    }

    #[test]
    fn retarget_from_rest_rearms_without_stepping() {
        let mut anim = CursorAnimator::new(space_a_z(), " ", CellConfig::new(MS_30)).unwrap();
        anim.tick(Duration::from_millis(100));
        anim.set_target("A");
        assert_eq!(current(&anim), " ");
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(130)));
    }

    #[test]
    fn alphabet_change_resets() {
        let mut anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        anim.tick(Duration::from_millis(90));
        assert_eq!(current(&anim), "Z");

        anim.set_alphabet(Alphabet::new(["1", "2", "3"]).unwrap());
        assert_eq!(current(&anim), "1");
        assert!(anim.is_resting()); // stale "Z" clamps to index 0
        assert_eq!(anim.cursor().previous, None);

        anim.set_target("3");
        anim.tick(Duration::from_millis(60));
        assert_eq!(current(&anim), "3");
    }

    #[test]
    fn lead_in_delays_first_step() {
        let config = CellConfig::new(MS_30).lead_in(Duration::from_millis(16));
        let anim = CursorAnimator::new(space_a_z(), "A", config).unwrap();
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(46)));
    }

    #[test]
    fn step_elapsed_tracks_interval() {
        let mut anim = CursorAnimator::new(space_a_z(), "Z", CellConfig::new(MS_30)).unwrap();
        anim.tick(Duration::from_millis(10));
        assert_eq!(anim.snapshot().step_elapsed, Duration::from_millis(10));
    }

    #[test]
    fn dispose_stops_interval() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let hits = Rc::new(RefCell::new(0));
        let mut anim = CursorAnimator::new(space_a_z(), " ", CellConfig::new(MS_30)).unwrap();
        let h = Rc::clone(&hits);
        anim.subscribe(move |_| *h.borrow_mut() += 1);
        anim.set_target("Z");
        anim.tick(MS_30);
        assert_eq!(current(&anim), "A");
        let before = *hits.borrow();

        anim.dispose();
        assert!(anim.is_disposed());
        assert!(anim.next_deadline().is_none());

        anim.tick(Duration::from_millis(300));
        anim.set_target(" ");
        assert_eq!(*hits.borrow(), before);
        assert!(anim.drain_events().is_empty());
        assert!(anim.next_deadline().is_none());
        assert_eq!(current(&anim), "A");
    }
}
