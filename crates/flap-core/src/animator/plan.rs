#![forbid(unsafe_code)]

//! Plan animator: precomputes every flip of a transition up front.
//!
//! A target change builds a [`TransitionPlan`] whose steps carry absolute
//! start delays, then arms one completion timer for the whole plan. The steps
//! themselves are never timed individually; the presentation layer renders
//! them as stacked frames offset by their delays, and [`PlanAnimator::snapshot`]
//! derives the visible step from the clock.
//!
//! # Invariants
//!
//! 1. `steps[0].start_delay == 0` and each later start delay is the sum of the
//!    durations before it (strictly increasing).
//! 2. Exactly one step, the last, has `is_last` and lasts 1.5x the step
//!    timing; every other step lasts exactly the step timing.
//! 3. The completion timer is due at `started_at + lead_in + total_duration()`.
//! 4. Re-targeting the value already targeted is a no-op.
//! 5. A preempting target re-plans from the glyph on the top half at that
//!    instant, replacing timer and plan in one notification.
//!
//! # Failure Modes
//!
//! - Target not in the alphabet: ignored, the running transition continues.
//! - Empty path (already there, or start glyph outside the alphabet): the
//!   cell snaps to the target with no timer.

use std::time::Duration;

use super::{CellAnimator, CellConfig, CellCore};
use crate::alphabet::{Alphabet, Glyph};
use crate::error::FlapError;
use crate::events::AnimatorEvent;
use crate::sequence::build_sequence;
use crate::snapshot::Snapshot;
use crate::subscribers::SubscriptionId;

/// One flip inside a [`TransitionPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Glyph the flap leaves.
    pub current: Glyph,
    /// Glyph the flap reveals.
    pub next: Glyph,
    /// Offset of this flip from the end of the lead-in.
    pub start_delay: Duration,
    /// Length of this flip.
    pub duration: Duration,
    /// Whether this is the final, slow flip.
    pub is_last: bool,
}

impl Step {
    /// Offset at which this flip ends.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start_delay + self.duration
    }
}

/// Every flip of one transition, with absolute timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    start: Glyph,
    target: Glyph,
    steps: Vec<Step>,
    lead_in: Duration,
    started_at: Duration,
}

impl TransitionPlan {
    /// Lay out the flips of `sequence` starting from `start`.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn new(
        start: Glyph,
        sequence: Vec<Glyph>,
        step_timing: Duration,
        lead_in: Duration,
        started_at: Duration,
    ) -> Option<Self> {
        let target = sequence.last()?.clone();
        let settle = step_timing * 3 / 2;
        let count = sequence.len();

        let mut steps = Vec::with_capacity(count);
        let mut current = start.clone();
        let mut offset = Duration::ZERO;
        for (i, next) in sequence.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let duration = if is_last { settle } else { step_timing };
            steps.push(Step {
                current: std::mem::replace(&mut current, next.clone()),
                next,
                start_delay: offset,
                duration,
                is_last,
            });
            offset += duration;
        }

        Some(Self {
            start,
            target,
            steps,
            lead_in,
            started_at,
        })
    }

    /// Glyph shown when the plan started.
    #[must_use]
    pub fn start(&self) -> &Glyph {
        &self.start
    }

    /// Glyph the plan ends on.
    #[must_use]
    pub fn target(&self) -> &Glyph {
        &self.target
    }

    /// The flips in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Delay before the first flip.
    #[must_use]
    pub fn lead_in(&self) -> Duration {
        self.lead_in
    }

    /// Clock reading when the plan was installed.
    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Sum of all step durations (lead-in excluded).
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.steps.last().map_or(Duration::ZERO, Step::end)
    }

    /// Clock reading at which the plan completes.
    #[must_use]
    pub fn completes_at(&self) -> Duration {
        self.started_at
            .saturating_add(self.lead_in)
            .saturating_add(self.total_duration())
    }

    /// Active step index and time spent in it at clock reading `now`.
    ///
    /// `None` while the lead-in is still running. Past the end, the last step
    /// is reported with its elapsed time clamped to its duration.
    #[must_use]
    pub fn step_at(&self, now: Duration) -> Option<(usize, Duration)> {
        let origin = self.started_at.saturating_add(self.lead_in);
        if now < origin {
            return None;
        }
        let offset = now - origin;
        let index = self
            .steps
            .partition_point(|step| step.end() <= offset)
            .min(self.steps.len().saturating_sub(1));
        let step = self.steps.get(index)?;
        let elapsed = offset.saturating_sub(step.start_delay).min(step.duration);
        Some((index, elapsed))
    }

    /// Glyph on the top half at clock reading `now`.
    #[must_use]
    pub fn glyph_at(&self, now: Duration) -> &Glyph {
        match self.step_at(now) {
            Some((index, _)) => &self.steps[index].current,
            None => &self.start,
        }
    }
}

/// Animator that front-loads each transition into a [`TransitionPlan`].
#[derive(Debug)]
pub struct PlanAnimator {
    core: CellCore,
    display: Glyph,
    /// Last value asked for, member or not. Survives alphabet swaps.
    requested: Glyph,
    /// Glyph the current plan heads to.
    target: Glyph,
    previous: Option<Glyph>,
    plan: Option<TransitionPlan>,
}

impl PlanAnimator {
    /// Create an animator showing `initial` at rest.
    ///
    /// `initial` is shown even if it is not in the alphabet; the first
    /// retarget then snaps instead of animating.
    ///
    /// # Errors
    ///
    /// [`FlapError::ZeroStepTiming`] for a zero step timing.
    pub fn new(alphabet: Alphabet, initial: &str, config: CellConfig) -> Result<Self, FlapError> {
        let display = alphabet
            .lookup(initial)
            .cloned()
            .unwrap_or_else(|| Glyph::from(initial));
        Ok(Self {
            core: CellCore::new(alphabet, config)?,
            requested: display.clone(),
            target: display.clone(),
            display,
            previous: None,
            plan: None,
        })
    }

    /// The committed glyph (last completed transition).
    #[must_use]
    pub fn display_value(&self) -> &Glyph {
        &self.display
    }

    /// The transition in flight, if any.
    #[must_use]
    pub fn plan(&self) -> Option<&TransitionPlan> {
        self.plan.as_ref()
    }

    /// Glyph on the top half right now.
    fn in_flight_glyph(&self) -> Glyph {
        match &self.plan {
            Some(plan) => plan.glyph_at(self.core.now).clone(),
            None => self.display.clone(),
        }
    }

    /// Install a plan (or snap) toward `value` without notifying.
    ///
    /// Returns `false` when nothing changed.
    fn retarget(&mut self, value: &str, lead_in: Duration) -> bool {
        if *self.target == *value {
            return false;
        }
        let Some(target) = self.core.alphabet.lookup(value).cloned() else {
            crate::debug!(value, "target not in alphabet, ignored");
            return false;
        };

        let now = self.core.now;
        let start = self.in_flight_glyph();
        if self.plan.take().is_some() {
            self.core.timer.cancel();
            self.core.emit(AnimatorEvent::Preempted { at: now });
        }
        self.target = target.clone();

        let sequence = build_sequence(self.core.alphabet.glyphs(), &start, &target);
        let steps = sequence.len();
        let timing = self.core.config.step_timing;
        match TransitionPlan::new(start.clone(), sequence, timing, lead_in, now) {
            Some(plan) => {
                crate::debug!(
                    from = %start,
                    to = %target,
                    steps,
                    lead_in_ms = lead_in.as_millis() as u64,
                    "transition planned"
                );
                self.core.timer.arm_once(plan.completes_at());
                self.core.emit(AnimatorEvent::TransitionStarted {
                    from: start,
                    to: target,
                    steps,
                });
                self.plan = Some(plan);
            }
            None => {
                crate::trace!(to = %target, "snapped without animating");
                if start != target {
                    self.previous = Some(start);
                }
                self.display = target.clone();
                self.core.emit(AnimatorEvent::Snapped { to: target });
            }
        }
        true
    }

    fn complete(&mut self) {
        let Some(plan) = self.plan.take() else {
            return;
        };
        self.previous = plan.steps.last().map(|step| step.current.clone());
        self.display = plan.target;
        crate::trace!(glyph = %self.display, "transition settled");
        self.core.emit(AnimatorEvent::Settled {
            glyph: self.display.clone(),
        });
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.core.notify(&snapshot);
    }
}

impl CellAnimator for PlanAnimator {
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
        &self.requested
    }

    fn set_target_after(&mut self, value: &str, lead_in: Duration) {
        if self.core.disposed || *self.requested == *value {
            return;
        }
        self.requested = Glyph::from(value);
        if self.retarget(value, lead_in) {
            self.publish();
        }
    }

    fn set_alphabet(&mut self, alphabet: Alphabet) {
        if self.core.disposed || alphabet == self.core.alphabet {
            return;
        }
        self.core.timer.cancel();
        self.plan = None;
        self.core.alphabet = alphabet;
        self.display = self.core.alphabet.first().clone();
        self.previous = None;
        self.core.emit(AnimatorEvent::Reset);

        self.target = self.display.clone();
        let requested = self.requested.clone();
        let lead_in = self.core.config.lead_in;
        self.retarget(&requested, lead_in);
        self.publish();
    }

    fn snapshot(&self) -> Snapshot {
        let Some(plan) = &self.plan else {
            return Snapshot::settled(self.display.clone(), self.previous.clone());
        };
        let Some(first) = plan.steps.first() else {
            return Snapshot::settled(self.display.clone(), self.previous.clone());
        };
        match plan.step_at(self.core.now) {
            None => Snapshot {
                current: plan.start.clone(),
                previous: None,
                next: first.next.clone(),
                step_elapsed: Duration::ZERO,
                step_duration: first.duration,
                resting: false,
            },
            Some((index, elapsed)) => {
                let step = &plan.steps[index];
                Snapshot {
                    current: step.current.clone(),
                    previous: index
                        .checked_sub(1)
                        .map(|prev| plan.steps[prev].current.clone()),
                    next: step.next.clone(),
                    step_elapsed: elapsed,
                    step_duration: step.duration,
                    resting: false,
                }
            }
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
            self.complete();
            self.publish();
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.core.timer.deadline()
    }

    fn is_resting(&self) -> bool {
        self.plan.is_none()
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
            self.plan = None;
            crate::trace!("plan animator disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.core.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_15: Duration = Duration::from_millis(15);
    const MS_30: Duration = Duration::from_millis(30);
    const MS_45: Duration = Duration::from_millis(45);

    fn space_a_z() -> Alphabet {
        Alphabet::new([" ", "A", "Z"]).unwrap()
    }

    fn animator(initial: &str) -> PlanAnimator {
        PlanAnimator::new(space_a_z(), initial, CellConfig::new(MS_30)).unwrap()
    }

    fn glyphs(items: &[&str]) -> Vec<Glyph> {
        items.iter().map(|g| Glyph::from(*g)).collect()
    }

    #[test]
    fn plan_layout_accumulates_delays() {
        let plan = TransitionPlan::new(
            " ".into(),
            glyphs(&["A", "B", "C"]),
            MS_30,
            Duration::ZERO,
            Duration::ZERO,
        )
        .unwrap();
        let steps = plan.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(&*steps[0].current, " ");
        assert_eq!(&*steps[0].next, "A");
        assert_eq!(&*steps[1].current, "A");
        assert_eq!(&*steps[2].current, "B");
        assert_eq!(&*steps[2].next, "C");
        assert_eq!(steps[0].start_delay, Duration::ZERO);
        assert_eq!(steps[1].start_delay, MS_30);
        assert_eq!(steps[2].start_delay, Duration::from_millis(60));
        assert_eq!(steps[2].duration, MS_45);
        assert!(steps[2].is_last);
        assert!(!steps[0].is_last && !steps[1].is_last);
        assert_eq!(plan.total_duration(), Duration::from_millis(105));
    }

    #[test]
    fn empty_sequence_has_no_plan() {
        let zero = Duration::ZERO;
        let plan = TransitionPlan::new(" ".into(), Vec::new(), MS_30, zero, zero);
        assert!(plan.is_none());
    }

    #[test]
    fn step_at_respects_lead_in() {
        let plan = TransitionPlan::new(
            " ".into(),
            glyphs(&["A", "Z"]),
            MS_30,
            Duration::from_millis(16),
            Duration::from_millis(100),
        )
        .unwrap();
        assert_eq!(plan.step_at(Duration::from_millis(110)), None);
        assert_eq!(plan.step_at(Duration::from_millis(116)), Some((0, Duration::ZERO)));
        assert_eq!(plan.step_at(Duration::from_millis(146)), Some((1, Duration::ZERO)));
        assert_eq!(plan.step_at(Duration::from_secs(10)), Some((1, MS_45)));
        assert_eq!(plan.completes_at(), Duration::from_millis(191));
    }

    #[test]
    fn starts_resting_on_initial_value() {
        let anim = animator("A");
        let snap = anim.snapshot();
        assert!(snap.resting);
        assert_eq!(&*snap.current, "A");
        assert!(anim.next_deadline().is_none());
    }

    #[test]
    fn transition_walks_steps_then_settles() {
        let mut anim = animator(" ");
        anim.set_target("Z");

        let snap = anim.snapshot();
        assert!(!snap.resting);
        assert_eq!(&*snap.current, " ");
        assert_eq!(&*snap.next, "A");
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(75)));

        anim.tick(MS_30);
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, "A");
        assert_eq!(&*snap.next, "Z");
        assert_eq!(snap.previous.as_deref(), Some(" "));
        assert_eq!(snap.step_duration, MS_45);

        anim.tick(MS_30);
        assert!(!anim.is_resting());
        anim.tick(MS_15);
        let snap = anim.snapshot();
        assert!(snap.resting);
        assert_eq!(&*snap.current, "Z");
        assert_eq!(snap.previous.as_deref(), Some("A"));
        assert!(anim.next_deadline().is_none());
    }

    #[test]
    fn repeated_target_is_noop() {
        let mut anim = animator(" ");
        anim.set_target("Z");
        let plan = anim.plan().cloned();
        anim.tick(MS_15);
        anim.set_target("Z");
        assert_eq!(anim.plan().cloned(), plan);
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(75)));
    }

    #[test]
    fn target_outside_alphabet_is_ignored() {
        let mut anim = animator(" ");
        anim.set_target("Q");
        assert!(anim.is_resting());
        assert_eq!(&*anim.snapshot().current, " ");
        assert_eq!(&**anim.target(), "Q");

        anim.set_target("Z");
        anim.set_target("Q");
        assert_eq!(&**anim.target(), "Q");
        assert!(!anim.is_resting());
        assert_eq!(&**anim.plan().unwrap().target(), "Z");
    }

    #[test]
    fn requested_target_survives_alphabet_round_trip() {
        let mut anim = animator(" ");
        anim.set_target("Z");
        anim.tick(Duration::from_secs(1));

        anim.set_alphabet(Alphabet::new(["X", "Y"]).unwrap());
        assert!(anim.is_resting());
        assert_eq!(&*anim.snapshot().current, "X");
        assert_eq!(&**anim.target(), "Z");

        anim.set_alphabet(space_a_z());
        assert!(!anim.is_resting());
        anim.tick(Duration::from_secs(1));
        assert_eq!(&*anim.snapshot().current, "Z");
        assert_eq!(&**anim.target(), "Z");
    }

    #[test]
    fn extreme_lead_in_saturates() {
        let mut anim = animator(" ");
        anim.set_target_after("A", Duration::MAX);
        assert_eq!(anim.next_deadline(), Some(Duration::MAX));
        assert_eq!(anim.plan().unwrap().completes_at(), Duration::MAX);
        anim.tick(Duration::from_secs(1));
        assert_eq!(&*anim.snapshot().current, " ");
    }

    #[test]
    fn preemption_replans_from_glyph_in_flight() {
        let mut anim = animator(" ");
        anim.set_target("Z");
        anim.tick(MS_30); // top half now shows "A"
        anim.set_target(" ");

        let plan = anim.plan().unwrap();
        assert_eq!(&**plan.start(), "A");
        assert_eq!(plan.steps().len(), 2); // A -> Z -> " "
        assert_eq!(plan.started_at(), MS_30);
        assert_eq!(anim.next_deadline(), Some(MS_30 + Duration::from_millis(75)));

        anim.tick(Duration::from_secs(1));
        assert!(anim.is_resting());
        assert_eq!(&*anim.snapshot().current, " ");
    }

    #[test]
    fn retarget_to_glyph_in_flight_snaps() {
        let mut anim = animator(" ");
        anim.set_target("Z");
        anim.tick(MS_30);
        anim.set_target("A");
        assert!(anim.is_resting());
        assert!(anim.next_deadline().is_none());
        assert_eq!(&*anim.snapshot().current, "A");
    }

    #[test]
    fn non_member_initial_snaps_on_first_target() {
        let mut anim = animator("?");
        assert_eq!(&*anim.snapshot().current, "?");
        anim.set_target("A");
        assert!(anim.is_resting());
        assert_eq!(&*anim.snapshot().current, "A");
        let events = anim.drain_events();
        assert_eq!(events, vec![AnimatorEvent::Snapped { to: "A".into() }]);
    }

    #[test]
    fn lead_in_delays_whole_plan() {
        let mut anim = animator(" ");
        anim.set_target_after("A", Duration::from_millis(16));
        assert_eq!(anim.next_deadline(), Some(Duration::from_millis(61)));
        anim.tick(Duration::from_millis(10));
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, " ");
        assert_eq!(snap.step_elapsed, Duration::ZERO);
        anim.tick(Duration::from_millis(51));
        assert!(anim.is_resting());
    }

    #[test]
    fn alphabet_change_restarts_from_first_glyph() {
        let mut anim = animator(" ");
        anim.set_target("Z");
        anim.tick(MS_15);

        anim.set_alphabet(Alphabet::new(["1", "2", "Z"]).unwrap());
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, "1");
        assert!(!snap.resting); // stale target "Z" is in the new alphabet
        assert_eq!(&**anim.plan().unwrap().start(), "1");

        anim.set_alphabet(Alphabet::new(["X", "Y"]).unwrap());
        let snap = anim.snapshot();
        assert_eq!(&*snap.current, "X");
        assert!(snap.resting); // "Z" is not a member
    }

    #[test]
    fn subscribers_see_plan_and_completion_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut anim = animator(" ");
        let log = Rc::clone(&seen);
        anim.subscribe(move |snap| log.borrow_mut().push((snap.current.clone(), snap.resting)));

        anim.set_target("Z");
        anim.tick(MS_30);
        anim.tick(MS_45);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!((&*seen[0].0, seen[0].1), (" ", false));
        assert_eq!((&*seen[1].0, seen[1].1), ("Z", true));
    }

    #[test]
    fn events_trace_lifecycle() {
        let mut anim = animator(" ");
        anim.set_target("A");
        anim.tick(MS_15);
        anim.set_target("Z");
        anim.tick(Duration::from_secs(1));
        let events = anim.drain_events();
        assert_eq!(
            events,
            vec![
                AnimatorEvent::TransitionStarted {
                    from: " ".into(),
                    to: "A".into(),
                    steps: 1
                },
                AnimatorEvent::Preempted { at: MS_15 },
                AnimatorEvent::TransitionStarted {
                    from: " ".into(),
                    to: "Z".into(),
                    steps: 2
                },
                AnimatorEvent::Settled { glyph: "Z".into() },
            ]
        );
    }

    #[test]
    fn dispose_silences_everything() {
        let hits = Rc::new(RefCell::new(0));
        let mut anim = animator(" ");
        let h = Rc::clone(&hits);
        anim.subscribe(move |_| *h.borrow_mut() += 1);
        anim.set_target("Z");
        assert_eq!(*hits.borrow(), 1);

        anim.dispose();
        anim.dispose();
        assert!(anim.is_disposed());
        assert!(anim.next_deadline().is_none());

        anim.tick(Duration::from_secs(1));
        anim.set_target(" ");
        assert_eq!(*hits.borrow(), 1);
        assert!(anim.drain_events().is_empty());
    }
}
