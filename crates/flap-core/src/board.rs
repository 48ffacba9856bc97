#![forbid(unsafe_code)]

//! Flap board: a row of cells driven together.
//!
//! A [`FlapBoard`] owns one animator per position, a shared alphabet and
//! config, and the [`StartDelayPolicy`] that staggers cells changing in the
//! same update. The host ticks the board; the board ticks every cell.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use flap_core::{Alphabet, CellConfig, FlapBoard, FormatOptions, ALPHANUM};
//!
//! let alphabet = Alphabet::from_chars(ALPHANUM)?;
//! let mut board: FlapBoard = FlapBoard::new(alphabet, CellConfig::default());
//! board.set_value("GATE 4", &FormatOptions::default().length(8))?;
//! while !board.is_resting() {
//!     board.tick(Duration::from_millis(16));
//! }
//! assert_eq!(board.text(), "GATE 4  ");
//! ```
//!
//! # Invariants
//!
//! 1. Cell `i` always targets `targets()[i]`.
//! 2. Only cells whose target changed request a start delay, in position
//!    order, so staggering follows reading order.
//! 3. Removed cells are disposed before they are dropped.
//! 4. After [`FlapBoard::dispose`] every mutating call is a no-op.
//!
//! # Failure Modes
//!
//! - Zero step timing: rejected when a cell is created.

use std::time::Duration;

use crate::alphabet::{Alphabet, Glyph};
use crate::animator::{CellAnimator, CellConfig, PlanAnimator};
use crate::error::FlapError;
use crate::events::AnimatorEvent;
use crate::format::{FormatOptions, format_value};
use crate::snapshot::Snapshot;
use crate::stagger::{NoStagger, StartDelayPolicy};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A row of cells sharing an alphabet, config and start-delay policy.
pub struct FlapBoard<A: CellAnimator = PlanAnimator> {
    alphabet: Alphabet,
    config: CellConfig,
    cells: Vec<A>,
    targets: Vec<Glyph>,
    policy: Box<dyn StartDelayPolicy>,
    now: Duration,
    disposed: bool,
}

impl<A: CellAnimator> std::fmt::Debug for FlapBoard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlapBoard")
            .field("cells", &self.cells.len())
            .field("text", &self.text())
            .field("now", &self.now)
            .field("resting", &self.is_resting())
            .field("disposed", &self.disposed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<A: CellAnimator> FlapBoard<A> {
    /// Create an empty board with no staggering.
    #[must_use]
    pub fn new(alphabet: Alphabet, config: CellConfig) -> Self {
        Self {
            alphabet,
            config,
            cells: Vec::new(),
            targets: Vec::new(),
            policy: Box::new(NoStagger),
            now: Duration::ZERO,
            disposed: false,
        }
    }

    /// Replace the start-delay policy (builder).
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn StartDelayPolicy>) -> Self {
        self.policy = policy;
        self
    }

    // -----------------------------------------------------------------------
    // Targets
    // -----------------------------------------------------------------------

    /// Point the board at new per-cell targets.
    ///
    /// New positions get a fresh cell created with their target as the
    /// initial value. Surplus cells are disposed. Existing cells whose
    /// target changed are retargeted with the config lead-in plus a delay
    /// from the policy.
    ///
    /// # Errors
    ///
    /// Propagates cell creation errors ([`FlapError::ZeroStepTiming`]).
    pub fn set_targets(&mut self, targets: &[Glyph]) -> Result<(), FlapError> {
        if self.disposed {
            return Ok(());
        }

        while self.cells.len() > targets.len() {
            if let Some(mut cell) = self.cells.pop() {
                cell.dispose();
            }
            self.targets.pop();
        }

        for (index, target) in targets.iter().enumerate() {
            if !self.alphabet.contains(target) {
                crate::warn!(index, glyph = %target, "target outside board alphabet");
            }
            if let Some(cell) = self.cells.get_mut(index) {
                if **cell.target() == **target {
                    self.targets[index] = target.clone();
                    continue;
                }
                let delay = self.policy.next_start_delay(self.now);
                cell.set_target_after(target, self.config.lead_in.saturating_add(delay));
                self.targets[index] = target.clone();
            } else {
                let cell = A::create(self.alphabet.clone(), target, self.config.clone())?;
                self.cells.push(cell);
                self.targets.push(target.clone());
            }
        }

        crate::debug!(
            cells = self.cells.len(),
            now_ms = self.now.as_millis() as u64,
            "board targets updated"
        );
        Ok(())
    }

    /// Format `value` and show it.
    ///
    /// # Errors
    ///
    /// Same as [`FlapBoard::set_targets`].
    pub fn set_value(&mut self, value: &str, options: &FormatOptions) -> Result<(), FlapError> {
        let targets = format_value(value, options);
        self.set_targets(&targets)
    }

    /// Swap the alphabet on every cell.
    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        if self.disposed || alphabet == self.alphabet {
            return;
        }
        for cell in &mut self.cells {
            cell.set_alphabet(alphabet.clone());
        }
        self.alphabet = alphabet;
        self.policy.reset();
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Advance every cell by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.disposed {
            return;
        }
        self.now = self.now.saturating_add(dt);
        for cell in &mut self.cells {
            cell.tick(dt);
        }
    }

    /// Board clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time until the earliest pending cell timer.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        self.cells
            .iter()
            .filter_map(CellAnimator::time_until_due)
            .min()
    }

    /// Board clock reading of the earliest pending cell timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.time_until_due().map(|due| self.now + due)
    }

    /// Whether every cell is resting.
    #[must_use]
    pub fn is_resting(&self) -> bool {
        self.cells.iter().all(CellAnimator::is_resting)
    }

    /// Take queued events from every cell, tagged with the cell position.
    pub fn drain_events(&mut self) -> Vec<(usize, AnimatorEvent)> {
        self.cells
            .iter_mut()
            .enumerate()
            .flat_map(|(index, cell)| {
                cell.drain_events()
                    .into_iter()
                    .map(move |event| (index, event))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The shared alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The shared cell config.
    #[must_use]
    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    /// Per-cell targets.
    #[must_use]
    pub fn targets(&self) -> &[Glyph] {
        &self.targets
    }

    /// The cells in position order.
    #[must_use]
    pub fn cells(&self) -> &[A] {
        &self.cells
    }

    /// Mutable access to the cell at `index`.
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut A> {
        self.cells.get_mut(index)
    }

    /// Snapshot of every cell.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.cells.iter().map(CellAnimator::snapshot).collect()
    }

    /// The glyphs currently on the top halves, concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.snapshot().current)
            .fold(String::new(), |mut out, glyph| {
                out.push_str(&glyph);
                out
            })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Dispose every cell. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for cell in &mut self.cells {
            cell.dispose();
        }
        crate::trace!(cells = self.cells.len(), "board disposed");
    }

    /// Whether [`dispose`](Self::dispose) was called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
