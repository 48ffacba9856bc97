#![forbid(unsafe_code)]

//! Face layouts: which half-glyphs a renderer stacks for one cell.
//!
//! A physical flap shows a top half and a bottom half. Mid-flip, the top
//! half of the old glyph falls to reveal the top of the new one, then the
//! bottom half of the new glyph falls over the old bottom. Renderers draw
//! these as stacked [`Face`]s, each tagged with [`FaceFlags`].
//!
//! Two layouts exist, one per animator:
//!
//! - [`cursor_faces`]: three faces while flipping, four once resting.
//! - [`plan_frames`]: one [`FrameSpec`] per step with delays relative to the
//!   plan's start; each frame expands to four faces via [`FrameSpec::faces`].

use std::time::Duration;

use bitflags::bitflags;

use crate::alphabet::Glyph;
use crate::animator::{CellAnimator, PlanAnimator};
use crate::snapshot::Snapshot;

bitflags! {
    /// Role of one half-glyph in a cell's stack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaceFlags: u8 {
        /// Upper half.
        const TOP      = 0b0000_0001;
        /// Lower half.
        const BOTTOM   = 0b0000_0010;
        /// Runs the fold animation.
        const ANIMATED = 0b0000_0100;
        /// Part of the resting pose; the animation ends here.
        const FINAL    = 0b0000_1000;
        /// Revealed behind a falling top half.
        const BACK     = 0b0001_0000;
        /// Drawn without animation.
        const STATIC   = 0b0010_0000;
    }
}

/// One half-glyph to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Glyph whose half is shown.
    pub glyph: Glyph,
    /// Role in the stack.
    pub flags: FaceFlags,
    /// Animation delay, relative to the owning frame's origin.
    pub delay: Duration,
}

impl Face {
    fn new(glyph: Glyph, flags: FaceFlags) -> Self {
        Self {
            glyph,
            flags,
            delay: Duration::ZERO,
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether this face shows at `progress` (0.0 to 1.0) through its flip.
    ///
    /// A falling top half covers the stack until the midpoint; a falling
    /// bottom half appears from the midpoint on. `FINAL` faces have already
    /// finished falling.
    #[must_use]
    pub fn is_visible(&self, progress: f32) -> bool {
        if !self.flags.contains(FaceFlags::ANIMATED) {
            return true;
        }
        let folded = self.flags.contains(FaceFlags::FINAL) || progress >= 0.5;
        if self.flags.contains(FaceFlags::TOP) {
            !folded
        } else {
            folded
        }
    }
}

/// The glyphs on the visible top and bottom halves of a face stack.
///
/// Later faces cover earlier ones. A half with no visible face is empty.
#[must_use]
pub fn visible_halves(faces: &[Face], progress: f32) -> (Glyph, Glyph) {
    let mut top = Glyph::from("");
    let mut bottom = Glyph::from("");
    for face in faces.iter().filter(|face| face.is_visible(progress)) {
        if face.flags.contains(FaceFlags::TOP) {
            top = face.glyph.clone();
        } else if face.flags.contains(FaceFlags::BOTTOM) {
            bottom = face.glyph.clone();
        }
    }
    (top, bottom)
}

/// Faces for a cursor-driven cell, bottom of the stack first.
///
/// A missing `previous` (first step after activation) renders as an empty
/// glyph.
#[must_use]
pub fn cursor_faces(snapshot: &Snapshot) -> Vec<Face> {
    let previous = snapshot.previous.clone().unwrap_or_else(|| Glyph::from(""));
    let mut falling = FaceFlags::TOP | FaceFlags::ANIMATED;
    if snapshot.resting {
        falling |= FaceFlags::FINAL;
    }

    let mut faces = vec![
        Face::new(snapshot.current.clone(), FaceFlags::TOP),
        Face::new(previous.clone(), FaceFlags::BOTTOM),
        Face::new(previous, falling),
    ];
    if snapshot.resting {
        faces.push(Face::new(
            snapshot.current.clone(),
            FaceFlags::BOTTOM | FaceFlags::ANIMATED | FaceFlags::FINAL,
        ));
    }
    faces
}

/// One flip (or the resting pose) of a plan-driven cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Glyph flipped away from.
    pub current: Glyph,
    /// Glyph flipped to.
    pub next: Glyph,
    /// Start of the flip, relative to the plan's start.
    pub delay: Duration,
    /// Step length the flip must fit in.
    pub timing: Duration,
    /// Resting pose without animation.
    pub is_static: bool,
}

impl FrameSpec {
    /// A static frame showing `glyph`.
    #[must_use]
    pub fn resting(glyph: Glyph, timing: Duration) -> Self {
        Self {
            next: glyph.clone(),
            current: glyph,
            delay: Duration::ZERO,
            timing,
            is_static: true,
        }
    }

    /// The flip in progress for a plan snapshot (`current` → `next`).
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            current: snapshot.current.clone(),
            next: snapshot.next.clone(),
            delay: Duration::ZERO,
            timing: snapshot.step_duration,
            is_static: snapshot.resting,
        }
    }

    /// The flip runs at twice the step rate so it ends before the next step.
    #[must_use]
    pub fn flap_timing(&self) -> Duration {
        self.timing / 2
    }

    /// Duration of each half's fold.
    #[must_use]
    pub fn half_duration(&self) -> Duration {
        self.flap_timing() / 2
    }

    /// When the bottom half of `next` starts falling.
    #[must_use]
    pub fn bottom_delay(&self) -> Duration {
        self.delay + self.half_duration()
    }

    /// Stacking order: later frames sit on top.
    #[must_use]
    pub fn z_index(&self) -> u128 {
        if self.is_static {
            0
        } else {
            self.delay.as_millis()
        }
    }

    /// Faces of this frame, bottom of the stack first.
    #[must_use]
    pub fn faces(&self) -> Vec<Face> {
        if self.is_static {
            return vec![
                Face::new(self.current.clone(), FaceFlags::TOP | FaceFlags::STATIC),
                Face::new(self.current.clone(), FaceFlags::BOTTOM | FaceFlags::STATIC),
            ];
        }
        vec![
            Face::new(self.next.clone(), FaceFlags::TOP | FaceFlags::BACK),
            Face::new(self.current.clone(), FaceFlags::TOP | FaceFlags::ANIMATED)
                .delayed(self.delay),
            Face::new(self.current.clone(), FaceFlags::BOTTOM),
            Face::new(self.next.clone(), FaceFlags::BOTTOM | FaceFlags::ANIMATED)
                .delayed(self.bottom_delay()),
        ]
    }
}

/// Frames for a plan-driven cell: one static frame at rest, otherwise one
/// frame per step of the active plan.
#[must_use]
pub fn plan_frames(animator: &PlanAnimator) -> Vec<FrameSpec> {
    let timing = animator.config().step_timing;
    let Some(plan) = animator.plan() else {
        return vec![FrameSpec::resting(animator.display_value().clone(), timing)];
    };
    plan.steps()
        .iter()
        .map(|step| FrameSpec {
            current: step.current.clone(),
            next: step.next.clone(),
            delay: plan.lead_in() + step.start_delay,
            timing: step.duration,
            is_static: false,
        })
        .collect()
}
