#![forbid(unsafe_code)]

//! Start-delay policies: cascading lead-ins for many cells.
//!
//! When a whole board changes at once, starting every cell on the same frame
//! is expensive and looks flat. A [`StartDelayPolicy`] hands each retargeted
//! cell a lead-in. [`BatchStagger`] lets `batch_size` cells start together,
//! then pushes each following batch back by `batch_delay`.
//!
//! The policy is owned by whoever composes the cells (usually a
//! [`FlapBoard`](crate::board::FlapBoard)); there is no process-wide counter.
//!
//! # Invariants
//!
//! 1. `NoStagger` always yields `Duration::ZERO`.
//! 2. Within one burst, the n-th request (0-based) from a `BatchStagger`
//!    yields `(n / batch_size) * batch_delay`.
//! 3. A request arriving `reset_after` or later after the previous one starts
//!    a new burst at n = 0.
//!
//! # Failure Modes
//!
//! - `batch_size == 0`: treated as unbounded, every delay is zero.
//! - Counter overflow: saturates at `u32::MAX` batches.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Policy trait
// ---------------------------------------------------------------------------

/// Source of per-cell start delays.
pub trait StartDelayPolicy {
    /// Lead-in for the next cell that starts a transition at `now`.
    fn next_start_delay(&mut self, now: Duration) -> Duration;

    /// Forget any burst in progress.
    fn reset(&mut self) {}
}

/// Every cell starts immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStagger;

impl StartDelayPolicy for NoStagger {
    fn next_start_delay(&mut self, _now: Duration) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Batch stagger
// ---------------------------------------------------------------------------

/// Configuration for [`BatchStagger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStaggerConfig {
    /// Cells allowed to start together.
    /// Default: 50
    pub batch_size: usize,

    /// Delay between consecutive batches.
    /// Default: 16ms (about one frame)
    pub batch_delay: Duration,

    /// Inactivity after which the counter starts over.
    /// Default: 1s
    pub reset_after: Duration,
}

impl Default for BatchStaggerConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            batch_delay: Duration::from_millis(16),
            reset_after: Duration::from_secs(1),
        }
    }
}

impl BatchStaggerConfig {
    /// Set the batch size (builder).
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the inter-batch delay (builder).
    #[must_use]
    pub fn batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    /// Set the inactivity reset window (builder).
    #[must_use]
    pub fn reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    /// Delay for the cell at position `index` within a burst.
    #[must_use]
    pub fn delay_for(&self, index: usize) -> Duration {
        if self.batch_size == 0 {
            return Duration::ZERO;
        }
        let batch = u32::try_from(index / self.batch_size).unwrap_or(u32::MAX);
        self.batch_delay.saturating_mul(batch)
    }
}

/// Counter-based batching with an inactivity reset.
#[derive(Debug, Clone, Default)]
pub struct BatchStagger {
    config: BatchStaggerConfig,
    count: usize,
    last_use: Option<Duration>,
}

impl BatchStagger {
    /// Create a stagger with the given config.
    #[must_use]
    pub fn new(config: BatchStaggerConfig) -> Self {
        Self {
            config,
            count: 0,
            last_use: None,
        }
    }

    /// The active config.
    #[must_use]
    pub fn config(&self) -> &BatchStaggerConfig {
        &self.config
    }

    /// Requests served in the current burst.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl StartDelayPolicy for BatchStagger {
    fn next_start_delay(&mut self, now: Duration) -> Duration {
        if let Some(last) = self.last_use
            && now.saturating_sub(last) >= self.config.reset_after
        {
            crate::trace!(served = self.count, "stagger burst reset");
            self.count = 0;
        }
        self.last_use = Some(now);

        let delay = self.config.delay_for(self.count);
        self.count = self.count.saturating_add(1);
        delay
    }

    fn reset(&mut self) {
        self.count = 0;
        self.last_use = None;
    }
}

/// Delays a fresh [`BatchStagger`] would hand out to `count` cells
/// requesting at the same instant.
#[must_use]
pub fn batch_offsets(count: usize, config: &BatchStaggerConfig) -> Vec<Duration> {
    (0..count).map(|i| config.delay_for(i)).collect()
}
