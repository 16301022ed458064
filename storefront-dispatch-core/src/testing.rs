//! Test utilities for storefront-dispatch applications
//!
//! - [`TestHarness`]: a store with an effect runner whose result actions are
//!   captured instead of being dispatched, so tests can inspect them first
//! - Assertion macros for verifying emitted actions
//!
//! # Example
//!
//! ```ignore
//! use storefront_dispatch::testing::TestHarness;
//! use storefront_dispatch::{assert_emitted, assert_not_emitted};
//!
//! let mut harness = TestHarness::new(AppState::default(), reducer);
//! harness.effects_mut().register(newsletter_effect(api));
//!
//! harness.dispatch(Action::SubscribeNewsletter { email: "a@b.co".into() });
//! let emitted = harness.settle_emitted().await;
//!
//! assert_emitted!(emitted, Action::SubscribeNewsletterSuccess { .. });
//! assert_not_emitted!(emitted, Action::SubscribeNewsletterFailure { .. });
//! harness.apply(emitted);
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::{Action, ActionPhase};
use crate::effect::{EffectRunner, InFlight};
use crate::store::{Reducer, Store};

/// Store plus effect runner, with effect results held back for inspection.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type (must implement [`Action`])
pub struct TestHarness<S, A: Action> {
    store: Store<S, A, EffectRunner<A>>,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
    in_flight: Arc<InFlight>,
}

impl<S, A: Action> TestHarness<S, A> {
    /// Create a harness around the given initial state and root reducer.
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let effects = EffectRunner::new(tx.clone());
        let in_flight = effects.in_flight_handle();
        Self {
            store: Store::with_middleware(state, reducer, effects),
            tx,
            rx,
            in_flight,
        }
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn store_mut(&mut self) -> &mut Store<S, A, EffectRunner<A>> {
        &mut self.store
    }

    pub fn effects_mut(&mut self) -> &mut EffectRunner<A> {
        self.store.middleware_mut()
    }

    /// Dispatch through the store. Matching effects start immediately.
    pub fn dispatch(&mut self, action: A) -> bool {
        self.store.dispatch(action)
    }

    /// Dispatch every action in order, returning how many changed state.
    pub fn apply(&mut self, actions: impl IntoIterator<Item = A>) -> usize {
        let mut changed = 0;
        for action in actions {
            if self.store.dispatch(action) {
                changed += 1;
            }
        }
        changed
    }

    /// Get a clone of the action sender for passing to handlers.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Emit an action without dispatching it (simulates an effect result).
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all emitted actions from the channel.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Wait for every in-flight effect job, then drain.
    pub async fn settle_emitted(&mut self) -> Vec<A> {
        while self.in_flight.get() > 0 {
            self.in_flight.idle().await;
        }
        self.drain_emitted()
    }

    /// Check if any actions were emitted.
    pub fn has_emitted(&mut self) -> bool {
        !self.drain_emitted().is_empty()
    }

    /// Drain emitted actions of one phase.
    ///
    /// Actions of other phases remain in the channel for later draining.
    pub fn drain_phase(&mut self, phase: ActionPhase) -> Vec<A> {
        let (matching, rest): (Vec<A>, Vec<A>) = self
            .drain_emitted()
            .into_iter()
            .partition(|action| action.phase() == phase);

        for action in rest {
            let _ = self.tx.send(action);
        }
        matching
    }
}

/// Pause the tokio clock. Timers only fire through [`advance_time`] afterwards.
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Advance the paused clock and let woken tasks (rotation timers, delayed jobs) run.
#[cfg(feature = "testing-time")]
pub async fn advance_time(by: std::time::Duration) {
    tokio::time::advance(by).await;
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// Assert that a specific action was emitted.
///
/// # Example
///
/// ```ignore
/// let actions = harness.drain_emitted();
/// assert_emitted!(actions, Action::LoadOffersSuccess(_));
/// assert_emitted!(actions, Action::SetCategory(Some(c)) if c == "outdoor");
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first action matching a pattern.
///
/// # Example
///
/// ```ignore
/// if let Some(Action::LoadOffersFailure(error)) = find_emitted!(actions, Action::LoadOffersFailure(_)) {
///     assert!(error.contains("timeout"));
/// }
/// ```
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many actions match a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
