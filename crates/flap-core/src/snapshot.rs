#![forbid(unsafe_code)]

//! The per-instant rendering state of one cell.

use std::time::Duration;

use crate::alphabet::Glyph;

/// What a presentation layer needs to draw one cell right now.
///
/// Field meaning depends slightly on the animator:
///
/// - Plan animator: the flip in progress is `current` → `next`; `previous` is
///   the glyph one step behind `current` within the transition (or the last
///   glyph flipped away from, once resting).
/// - Cursor animator: the cursor has already advanced, so the flip in
///   progress is `previous` → `current` and `next == current`.
///
/// In both, `resting` means the cell shows its target and has no pending
/// timer; a resting snapshot has `next == current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Glyph on the top half.
    pub current: Glyph,
    /// Glyph one step behind `current`, if any.
    pub previous: Option<Glyph>,
    /// Glyph the cell turns to when the running flip completes.
    pub next: Glyph,
    /// Time spent in the current step.
    pub step_elapsed: Duration,
    /// Length of the current step (`ZERO` when resting).
    pub step_duration: Duration,
    /// Whether the cell has settled on its target.
    pub resting: bool,
}

impl Snapshot {
    /// A settled snapshot showing `glyph`.
    #[must_use]
    pub fn settled(glyph: Glyph, previous: Option<Glyph>) -> Self {
        Self {
            next: glyph.clone(),
            current: glyph,
            previous,
            step_elapsed: Duration::ZERO,
            step_duration: Duration::ZERO,
            resting: true,
        }
    }

    /// Fraction of the current step elapsed, in [0.0, 1.0].
    ///
    /// Resting snapshots report 1.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.resting || self.step_duration.is_zero() {
            return 1.0;
        }
        let t = self.step_elapsed.as_secs_f64() / self.step_duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}
