#![forbid(unsafe_code)]

//! Flap core: glyph sequencing and flip-animation scheduling for split-flap
//! displays.
//!
//! A cell flips forward through an ordered, cyclic [`Alphabet`] until it
//! shows its target. [`CellAnimator`] is the per-cell contract with two
//! strategies ([`PlanAnimator`], [`CursorAnimator`]); [`FlapBoard`] drives a
//! row of cells with staggered start delays. Everything runs on a virtual
//! clock advanced by `tick`, so hosts decide how time passes.

pub mod alphabet;
pub mod animator;
pub mod board;
pub mod error;
pub mod events;
pub mod faces;
pub mod format;
pub mod logging;
pub mod sequence;
pub mod snapshot;
pub mod stagger;
pub mod subscribers;
pub mod timer;

pub use alphabet::{ALPHANUM, Alphabet, Glyph, NUM};
pub use animator::{
    CellAnimator, CellConfig, Cursor, CursorAnimator, PlanAnimator, Step, TransitionPlan,
};
pub use board::FlapBoard;
pub use error::FlapError;
pub use events::AnimatorEvent;
pub use faces::{Face, FaceFlags, FrameSpec, cursor_faces, plan_frames, visible_halves};
pub use format::{DisplayMode, FormatOptions, PadMode, format_value};
pub use sequence::build_sequence;
pub use snapshot::Snapshot;
pub use stagger::{BatchStagger, BatchStaggerConfig, NoStagger, StartDelayPolicy};
pub use subscribers::SubscriptionId;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
