//! Effect runner: actions in, async work out, result actions back
//!
//! Effects observe every dispatched action. When an [`Effect`] reacts to an
//! action it returns a [`Job`]: a keyed future that talks to an external
//! collaborator and resolves to either a result action or an error. The
//! [`EffectRunner`] spawns the job on tokio and sends exactly one action back
//! through the action channel:
//!
//! - `Ok(action)` is sent as-is (the success action)
//! - `Err(e)` is stringified and turned into the job's failure action
//! - a panic inside the job is caught and turned into the failure action too
//!
//! Effects never touch the state. The only way their outcome reaches the
//! store is the result action, which goes through the reducer like any other.
//!
//! # Example
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut runner = EffectRunner::new(tx);
//!
//! runner.register(effect::from_fn("offers", move |action: &Action| match action {
//!     Action::LoadOffers => {
//!         let api = api.clone();
//!         Some(Job::new(
//!             "offers",
//!             async move { api.offers().await.map(Action::LoadOffersSuccess) },
//!             Action::LoadOffersFailure,
//!         ))
//!     }
//!     _ => None,
//! }));
//! ```
//!
//! # Concurrency
//!
//! With [`Concurrency::Concurrent`] (the default) jobs of the same key run
//! side by side and every result is delivered; whichever lands last wins the
//! slice. [`Concurrency::Latest`] keeps a generation counter per key and drops
//! results of jobs that were superseded by a newer job of the same key. In
//! neither mode is an in-flight job cancelled.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{mpsc, Notify};

use crate::store::Middleware;
use crate::Action;

/// Boxed, sendable future used for job work
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type FailureFn<A> = Box<dyn FnOnce(String) -> A + Send + 'static>;

/// A unit of asynchronous work spawned in reaction to an action.
pub struct Job<A> {
    key: &'static str,
    work: BoxFuture<Result<A, String>>,
    fail: FailureFn<A>,
}

impl<A: Action> Job<A> {
    /// Create a job.
    ///
    /// `work` resolves to the success action or an error; `fail` builds the
    /// failure action from the stringified error.
    pub fn new<F, E>(
        key: &'static str,
        work: F,
        fail: impl FnOnce(String) -> A + Send + 'static,
    ) -> Self
    where
        F: Future<Output = Result<A, E>> + Send + 'static,
        E: Display,
    {
        Self {
            key,
            work: Box::pin(async move { work.await.map_err(|e| e.to_string()) }),
            fail: Box::new(fail),
        }
    }

    /// Key used for logging and for [`Concurrency::Latest`] bookkeeping
    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<A> std::fmt::Debug for Job<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").field("key", &self.key).finish()
    }
}

/// Reacts to dispatched actions by producing jobs.
pub trait Effect<A: Action>: Send + 'static {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Return the work for `action`, or `None` if this effect ignores it.
    fn run(&self, action: &A) -> Option<Job<A>>;
}

/// An effect backed by a closure. Created with [`from_fn`].
pub struct FnEffect<F> {
    name: &'static str,
    f: F,
}

/// Build an effect from a closure.
pub fn from_fn<A, F>(name: &'static str, f: F) -> FnEffect<F>
where
    A: Action,
    F: Fn(&A) -> Option<Job<A>> + Send + 'static,
{
    FnEffect { name, f }
}

impl<A, F> Effect<A> for FnEffect<F>
where
    A: Action,
    F: Fn(&A) -> Option<Job<A>> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, action: &A) -> Option<Job<A>> {
        (self.f)(action)
    }
}

/// What happens when a job starts while another job with the same key is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concurrency {
    /// Every result is delivered; the last one to arrive wins
    #[default]
    Concurrent,
    /// Only the result of the newest job per key is delivered
    Latest,
}

/// Counts running jobs and wakes waiters when the count drops to zero.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub(crate) fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Wait for the next "became idle" signal.
    pub(crate) async fn idle(&self) {
        self.idle.notified().await
    }

    fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(Arc::clone(self))
    }
}

struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_one();
        }
    }
}

/// Runs registered effects for every observed action.
///
/// Requires a tokio runtime when a job is spawned.
pub struct EffectRunner<A: Action> {
    effects: Vec<Box<dyn Effect<A>>>,
    action_tx: mpsc::UnboundedSender<A>,
    concurrency: Concurrency,
    generations: HashMap<&'static str, Arc<AtomicU64>>,
    in_flight: Arc<InFlight>,
}

impl<A: Action> EffectRunner<A> {
    /// Create a runner that sends result actions to `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            effects: Vec::new(),
            action_tx,
            concurrency: Concurrency::default(),
            generations: HashMap::new(),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Register an effect. Effects run in registration order.
    pub fn register(&mut self, effect: impl Effect<A>) -> &mut Self {
        self.effects.push(Box::new(effect));
        self
    }

    pub fn set_concurrency(&mut self, concurrency: Concurrency) -> &mut Self {
        self.concurrency = concurrency;
        self
    }

    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    /// Number of registered effects
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Number of jobs that have not delivered their result yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    pub(crate) fn in_flight_handle(&self) -> Arc<InFlight> {
        Arc::clone(&self.in_flight)
    }

    /// Offer an action to every effect and spawn the resulting jobs.
    ///
    /// Returns the number of jobs spawned.
    pub fn observe(&mut self, action: &A) -> usize {
        let jobs: Vec<(&'static str, Job<A>)> = self
            .effects
            .iter()
            .filter_map(|effect| effect.run(action).map(|job| (effect.name(), job)))
            .collect();

        let spawned = jobs.len();
        for (effect, job) in jobs {
            tracing::debug!(effect, job = job.key, action = %action.name(), "spawning job");
            self.spawn(job);
        }
        spawned
    }

    fn spawn(&mut self, job: Job<A>) {
        let Job { key, work, fail } = job;

        let generation = match self.concurrency {
            Concurrency::Concurrent => None,
            Concurrency::Latest => {
                let counter = Arc::clone(self.generations.entry(key).or_default());
                let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Some((counter, current))
            }
        };

        let tx = self.action_tx.clone();
        let guard = self.in_flight.enter();

        tokio::spawn(async move {
            let _guard = guard;

            // Run the work in its own task so a panic is reported through
            // the JoinError instead of unwinding this one.
            let action = match tokio::spawn(work).await {
                Ok(Ok(action)) => action,
                Ok(Err(message)) => {
                    tracing::warn!(job = key, error = %message, "job failed");
                    fail(message)
                }
                Err(err) => {
                    let message = if err.is_panic() {
                        panic_message(err.into_panic())
                    } else {
                        "job was cancelled".to_string()
                    };
                    tracing::error!(job = key, error = %message, "job aborted");
                    fail(message)
                }
            };

            if let Some((counter, mine)) = generation {
                if counter.load(Ordering::SeqCst) != mine {
                    tracing::debug!(job = key, "dropping stale result");
                    return;
                }
            }

            if tx.send(action).is_err() {
                tracing::debug!(job = key, "action channel closed, result dropped");
            }
        });
    }
}

impl<A: Action> Middleware<A> for EffectRunner<A> {
    fn before(&mut self, _action: &A) {}

    fn after(&mut self, action: &A, _state_changed: bool) {
        self.observe(action);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        format!("job panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("job panicked: {s}")
    } else {
        "job panicked".to_string()
    }
}
