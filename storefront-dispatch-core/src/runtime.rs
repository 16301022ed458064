//! Runtime loop wiring the store, the action logger and the effect runner.
//!
//! ```ignore
//! let mut runtime = Runtime::new(AppState::default(), reducer);
//! runtime.effects_mut().register(OffersEffect::new(api));
//!
//! runtime.dispatch(Action::LoadOffers);
//! // Wait for every spawned job and apply its result action
//! runtime.settle().await;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::ActionSummary;
use crate::effect::{EffectRunner, InFlight};
use crate::logger::ActionLoggerMiddleware;
use crate::store::{Reducer, Store};

/// Middleware stack used by [`Runtime`]
pub type RuntimeMiddleware<A> = (ActionLoggerMiddleware, EffectRunner<A>);

/// Owns the store and the channel that effect results come back on.
///
/// Everything runs on the task that owns the runtime: reducers, selectors
/// and subscriptions execute synchronously inside [`Runtime::dispatch`];
/// effect jobs run on tokio and only re-enter through the channel.
pub struct Runtime<S, A: ActionSummary> {
    store: Store<S, A, RuntimeMiddleware<A>>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    in_flight: Arc<InFlight>,
}

impl<S, A: ActionSummary> Runtime<S, A> {
    /// Create a runtime with a tracing-only action logger.
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self::with_logger(state, reducer, ActionLoggerMiddleware::default())
    }

    /// Create a runtime with a custom action logger.
    pub fn with_logger(state: S, reducer: Reducer<S, A>, logger: ActionLoggerMiddleware) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let effects = EffectRunner::new(action_tx.clone());
        let in_flight = effects.in_flight_handle();
        Self {
            store: Store::with_middleware(state, reducer, (logger, effects)),
            action_tx,
            action_rx,
            in_flight,
        }
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn store(&self) -> &Store<S, A, RuntimeMiddleware<A>> {
        &self.store
    }

    /// Access the store, e.g. to add subscriptions
    pub fn store_mut(&mut self) -> &mut Store<S, A, RuntimeMiddleware<A>> {
        &mut self.store
    }

    pub fn effects(&self) -> &EffectRunner<A> {
        &self.store.middleware().1
    }

    pub fn effects_mut(&mut self) -> &mut EffectRunner<A> {
        &mut self.store.middleware_mut().1
    }

    pub fn logger(&self) -> &ActionLoggerMiddleware {
        &self.store.middleware().0
    }

    /// Sender for actions produced outside the runtime (timers, input handlers)
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    /// Dispatch an action synchronously.
    pub fn dispatch(&mut self, action: A) -> bool {
        self.store.dispatch(action)
    }

    /// Dispatch every action already waiting in the channel.
    ///
    /// Returns the number of actions dispatched.
    pub fn drain(&mut self) -> usize {
        let mut dispatched = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.store.dispatch(action);
            dispatched += 1;
        }
        dispatched
    }

    /// Wait for the next queued action and dispatch it.
    ///
    /// Returns `false` if the channel is closed.
    pub async fn step(&mut self) -> bool {
        match self.action_rx.recv().await {
            Some(action) => {
                self.store.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Run until no job is in flight and no result is waiting.
    pub async fn settle(&mut self) {
        loop {
            // Read the counter before draining: a job decrements only after
            // its result was sent, so an idle reading means the drain below
            // sees every result.
            let idle = self.in_flight.get() == 0;
            let dispatched = self.drain();
            if idle && dispatched == 0 {
                return;
            }
            if dispatched == 0 {
                tokio::select! {
                    received = self.action_rx.recv() => match received {
                        Some(action) => {
                            self.store.dispatch(action);
                        }
                        None => return,
                    },
                    _ = self.in_flight.idle() => {}
                }
            }
        }
    }

    /// Process queued actions until `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                more = self.step() => {
                    if !more {
                        break;
                    }
                }
            }
        }
        tracing::debug!(in_flight = self.in_flight.get(), "runtime stopped");
    }
}
