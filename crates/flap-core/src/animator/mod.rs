#![forbid(unsafe_code)]

//! Cell animators: the per-position flip state machines.
//!
//! Two interchangeable strategies implement [`CellAnimator`]:
//!
//! - [`PlanAnimator`] computes the whole path on each target change, keeps a
//!   single completion timer, and derives the visible step from the clock.
//!   This is the production path.
//! - [`CursorAnimator`] advances an index cursor one glyph per tick of an
//!   interval timer. It is simpler to reason about and serves as a reference
//!   model for the plan animator.
//!
//! Both run on a virtual clock advanced by [`CellAnimator::tick`]. A host
//! loop ticks every animator with the real elapsed time and may sleep for
//! [`CellAnimator::time_until_due`] between ticks.
//!
//! # Invariants
//!
//! 1. At most one live timer per animator.
//! 2. A resting animator has no live timer.
//! 3. After [`CellAnimator::dispose`] no timer fires, no subscriber runs and
//!    no event is queued; every further call is a no-op.

use std::time::Duration;

use crate::alphabet::{Alphabet, Glyph};
use crate::error::FlapError;
use crate::events::{AnimatorEvent, EventQueue};
use crate::snapshot::Snapshot;
use crate::subscribers::{SubscriptionId, Subscribers};
use crate::timer::TimerSlot;

pub mod cursor;
pub mod plan;

pub use cursor::{Cursor, CursorAnimator};
pub use plan::{PlanAnimator, Step, TransitionPlan};

/// Timing configuration for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConfig {
    /// Time per flip. The final flip of a transition takes 1.5x this.
    /// Default: 30ms
    pub step_timing: Duration,

    /// Delay added before the first flip of every transition started with
    /// [`CellAnimator::set_target`].
    /// Default: 0
    pub lead_in: Duration,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            step_timing: Duration::from_millis(30),
            lead_in: Duration::ZERO,
        }
    }
}

impl CellConfig {
    /// Config with the given step timing and no lead-in.
    #[must_use]
    pub fn new(step_timing: Duration) -> Self {
        Self {
            step_timing,
            ..Self::default()
        }
    }

    /// Set the default lead-in (builder).
    #[must_use]
    pub fn lead_in(mut self, lead_in: Duration) -> Self {
        self.lead_in = lead_in;
        self
    }

    /// Duration of the slow final flip.
    #[must_use]
    pub fn settle_duration(&self) -> Duration {
        self.step_timing * 3 / 2
    }

    /// Check the config can drive an animator.
    ///
    /// # Errors
    ///
    /// [`FlapError::ZeroStepTiming`] if `step_timing` is zero.
    pub fn validate(&self) -> Result<(), FlapError> {
        if self.step_timing.is_zero() {
            return Err(FlapError::ZeroStepTiming);
        }
        Ok(())
    }
}

/// The contract shared by both animation strategies.
pub trait CellAnimator {
    /// Create an animator showing (or heading for) `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`FlapError::ZeroStepTiming`] for an unusable config.
    fn create(alphabet: Alphabet, initial: &str, config: CellConfig) -> Result<Self, FlapError>
    where
        Self: Sized;

    /// The active alphabet.
    fn alphabet(&self) -> &Alphabet;

    /// The active config.
    fn config(&self) -> &CellConfig;

    /// The value currently being targeted.
    fn target(&self) -> &Glyph;

    /// Retarget using the config's default lead-in.
    fn set_target(&mut self, value: &str) {
        let lead_in = self.config().lead_in;
        self.set_target_after(value, lead_in);
    }

    /// Retarget, delaying the first flip by `lead_in`.
    fn set_target_after(&mut self, value: &str, lead_in: Duration);

    /// Swap the alphabet, restarting from its first glyph. Equal alphabets
    /// are ignored.
    fn set_alphabet(&mut self, alphabet: Alphabet);

    /// Rendering state at the current clock reading.
    fn snapshot(&self) -> Snapshot;

    /// Current clock reading (time since creation).
    fn now(&self) -> Duration;

    /// Advance the clock by `dt`, firing due timers in order.
    fn tick(&mut self, dt: Duration);

    /// Clock reading at which the live timer fires.
    fn next_deadline(&self) -> Option<Duration>;

    /// Time until the live timer fires.
    fn time_until_due(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now()))
    }

    /// Whether the cell shows its target with nothing pending.
    fn is_resting(&self) -> bool;

    /// Call `callback` with a fresh snapshot after every state change.
    fn subscribe(&mut self, callback: impl FnMut(&Snapshot) + 'static) -> SubscriptionId;

    /// Remove a subscriber. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Take queued milestone events.
    fn drain_events(&mut self) -> Vec<AnimatorEvent>;

    /// Cancel timers and drop subscribers. Idempotent.
    fn dispose(&mut self);

    /// Whether [`dispose`](Self::dispose) was called.
    fn is_disposed(&self) -> bool;
}

/// State every animator carries regardless of strategy.
#[derive(Debug)]
pub(crate) struct CellCore {
    pub(crate) alphabet: Alphabet,
    pub(crate) config: CellConfig,
    pub(crate) now: Duration,
    pub(crate) timer: TimerSlot,
    pub(crate) subscribers: Subscribers<Snapshot>,
    pub(crate) events: EventQueue,
    pub(crate) disposed: bool,
}

impl CellCore {
    pub(crate) fn new(alphabet: Alphabet, config: CellConfig) -> Result<Self, FlapError> {
        config.validate()?;
        Ok(Self {
            alphabet,
            config,
            now: Duration::ZERO,
            timer: TimerSlot::new(),
            subscribers: Subscribers::new(),
            events: EventQueue::new(),
            disposed: false,
        })
    }

    pub(crate) fn emit(&mut self, event: AnimatorEvent) {
        if !self.disposed {
            self.events.push(event);
        }
    }

    pub(crate) fn notify(&mut self, snapshot: &Snapshot) {
        if !self.disposed {
            self.subscribers.notify(snapshot);
        }
    }

    /// Returns `true` the first time only.
    pub(crate) fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.timer.cancel();
        self.subscribers.clear();
        self.events.clear();
        true
    }
}
