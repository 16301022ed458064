//! Timer-driven rotation over an ordered collection (carousel auto-advance)
//!
//! A [`RotationScheduler`] owns at most one interval task. The task is an
//! explicit resource: [`RotationScheduler::start`] acquires it,
//! [`RotationScheduler::stop`] (or dropping the scheduler) releases it.
//!
//! # Example
//!
//! ```ignore
//! let mut carousel = RotationScheduler::new();
//! carousel.start(slides, Duration::from_secs(5));
//!
//! let mut index = carousel.subscribe();
//! while index.changed().await.is_ok() {
//!     render_slide(*index.borrow());
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

struct Timer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Timer {
    fn cancel(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Periodically advances a wraparound index over `items`.
///
/// Invariants:
/// - `current()` is a valid index whenever `items` is non-empty (0 otherwise)
/// - a timer exists only while rotation is active and there is more than one item
pub struct RotationScheduler<T> {
    items: Vec<T>,
    period: Duration,
    index: Arc<watch::Sender<usize>>,
    timer: Option<Timer>,
}

impl<T> Default for RotationScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RotationScheduler<T> {
    /// Create an idle scheduler with no items.
    pub fn new() -> Self {
        let (index, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            period: Duration::ZERO,
            index: Arc::new(index),
            timer: None,
        }
    }

    /// Replace the items and start rotating every `period`.
    ///
    /// Any existing timer is cleared first and the index returns to 0.
    /// With one item or none, no timer is created.
    ///
    /// Must be called from within a tokio runtime when more than one item is given.
    pub fn start(&mut self, items: Vec<T>, period: Duration) {
        self.stop();
        self.items = items;
        self.period = period;
        self.index.send_replace(0);

        if self.items.len() > 1 && !period.is_zero() {
            self.spawn_timer();
        } else {
            tracing::debug!(items = self.items.len(), "rotation idle");
        }
    }

    /// Clear the timer. The items and index are kept.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
            tracing::debug!("rotation stopped");
        }
    }

    /// Move to the next item, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.index.send_modify(|i| *i = (*i + 1) % len);
    }

    /// Move to the previous item, wrapping to the last.
    pub fn previous(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.index.send_modify(|i| *i = (*i + len - 1) % len);
    }

    /// Jump to `index` and restart the countdown to the next automatic advance.
    ///
    /// Out-of-range indices are clamped to the last item.
    pub fn go_to(&mut self, index: usize) {
        let clamped = index.min(self.items.len().saturating_sub(1));
        self.index.send_replace(clamped);

        if self.timer.is_some() {
            self.stop();
            self.spawn_timer();
        }
    }

    pub fn current(&self) -> usize {
        *self.index.borrow()
    }

    pub fn current_item(&self) -> Option<&T> {
        self.items.get(self.current())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the automatic advance timer is active
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Receiver notified on every index change, manual or timer-driven.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.subscribe()
    }

    fn spawn_timer(&mut self) {
        let len = self.items.len();
        let period = self.period;
        let index = Arc::clone(&self.index);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        // First advance one full period after (re)start
        let first = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(first, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        index.send_modify(|i| *i = (*i + 1) % len);
                        tracing::trace!(index = *index.borrow(), "rotation tick");
                    }
                }
            }
        });

        self.timer = Some(Timer { cancel, handle });
        tracing::debug!(items = len, period_ms = period.as_millis() as u64, "rotation started");
    }
}

impl<T> Drop for RotationScheduler<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
