#![forbid(unsafe_code)]

//! Single-slot timers on a virtual clock.
//!
//! Each animator owns exactly one [`TimerSlot`]. Time is a [`Duration`] since
//! the owner was created and only moves when the host ticks the owner, so
//! firing order is deterministic and tests need no real sleeping.
//!
//! # Invariants
//!
//! 1. A slot holds at most one live timer.
//! 2. Arming a slot replaces (and thereby cancels) any live timer.
//! 3. Every arm produces a fresh [`TimerId`]; an id from a cancelled or
//!    replaced timer never fires.
//! 4. A one-shot timer disarms itself when it fires; an interval timer moves
//!    its deadline forward by one period.

use std::time::Duration;

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: TimerId,
    deadline: Duration,
    period: Option<Duration>,
}

/// Holder for at most one pending timer.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    generation: u64,
    armed: Option<Armed>,
}

impl TimerSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> TimerId {
        self.generation = self.generation.wrapping_add(1);
        TimerId(self.generation)
    }

    /// Arm a one-shot timer firing at `deadline`.
    pub fn arm_once(&mut self, deadline: Duration) -> TimerId {
        let id = self.next_id();
        self.armed = Some(Armed {
            id,
            deadline,
            period: None,
        });
        id
    }

    /// Arm an interval timer: first firing at `first`, then every `period`.
    ///
    /// A zero period is bumped to one nanosecond so the deadline always
    /// advances.
    pub fn arm_interval(&mut self, first: Duration, period: Duration) -> TimerId {
        let id = self.next_id();
        let period = if period.is_zero() {
            Duration::from_nanos(1)
        } else {
            period
        };
        self.armed = Some(Armed {
            id,
            deadline: first,
            period: Some(period),
        });
        id
    }

    /// Cancel the live timer, returning its id if there was one.
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.armed.take().map(|armed| armed.id)
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Id of the pending timer.
    #[must_use]
    pub fn current(&self) -> Option<TimerId> {
        self.armed.map(|armed| armed.id)
    }

    /// Deadline of the pending timer.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.armed.map(|armed| armed.deadline)
    }

    /// Fire the pending timer if it is due at `now`.
    ///
    /// Returns the fired id and the deadline it was scheduled for. Call in a
    /// loop to catch up an interval timer that fell several periods behind.
    pub fn poll(&mut self, now: Duration) -> Option<(TimerId, Duration)> {
        let armed = self.armed?;
        if armed.deadline > now {
            return None;
        }
        self.armed = armed.period.map(|period| Armed {
            deadline: armed.deadline.saturating_add(period),
            ..armed
        });
        Some((armed.id, armed.deadline))
    }

    /// Time from `now` until the pending timer is due.
    #[must_use]
    pub fn time_until(&self, now: Duration) -> Option<Duration> {
        self.armed.map(|armed| armed.deadline.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_30: Duration = Duration::from_millis(30);

    #[test]
    fn once_fires_at_deadline_then_disarms() {
        let mut slot = TimerSlot::new();
        let id = slot.arm_once(MS_30);
        assert_eq!(slot.poll(MS_10), None);
        assert_eq!(slot.poll(MS_30), Some((id, MS_30)));
        assert!(!slot.is_armed());
        assert_eq!(slot.poll(Duration::from_secs(1)), None);
    }

    #[test]
    fn interval_advances_by_period() {
        let mut slot = TimerSlot::new();
        let id = slot.arm_interval(MS_30, MS_30);
        assert_eq!(slot.poll(MS_30), Some((id, MS_30)));
        assert_eq!(slot.deadline(), Some(Duration::from_millis(60)));
        assert!(slot.is_armed());
    }

    #[test]
    fn interval_catches_up_in_order() {
        let mut slot = TimerSlot::new();
        slot.arm_interval(MS_10, MS_10);
        let mut fired = Vec::new();
        while let Some((_, at)) = slot.poll(MS_30) {
            fired.push(at);
        }
        assert_eq!(fired, vec![MS_10, Duration::from_millis(20), MS_30]);
    }

    #[test]
    fn rearm_replaces_and_changes_id() {
        let mut slot = TimerSlot::new();
        let first = slot.arm_once(MS_10);
        let second = slot.arm_once(MS_30);
        assert_ne!(first, second);
        assert_eq!(slot.current(), Some(second));
        // The replaced deadline no longer fires.
        assert_eq!(slot.poll(MS_10), None);
    }

    #[test]
    fn cancel_returns_id() {
        let mut slot = TimerSlot::new();
        let id = slot.arm_once(MS_10);
        assert_eq!(slot.cancel(), Some(id));
        assert_eq!(slot.cancel(), None);
        assert_eq!(slot.poll(MS_30), None);
    }

    #[test]
    fn time_until_saturates() {
        let mut slot = TimerSlot::new();
        assert_eq!(slot.time_until(MS_10), None);
        slot.arm_once(MS_30);
        assert_eq!(slot.time_until(MS_10), Some(Duration::from_millis(20)));
        assert_eq!(slot.time_until(Duration::from_secs(1)), Some(Duration::ZERO));
    }

    #[test]
    fn zero_period_still_advances() {
        let mut slot = TimerSlot::new();
        slot.arm_interval(Duration::ZERO, Duration::ZERO);
        assert!(slot.poll(Duration::ZERO).is_some());
        assert_eq!(slot.poll(Duration::ZERO), None);
    }
}
