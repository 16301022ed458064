//! Centralized state store with reducer pattern

use std::rc::Rc;
use std::sync::Arc;

use crate::selector::{Inputs, Selector};
use crate::Action;

/// Follow-up actions deeper than this are dropped.
pub const MAX_DISPATCH_DEPTH: usize = 32;

/// The root reducer: routes an action to the slice that owns it.
///
/// Returns `true` if any slice was replaced.
pub type Reducer<S, A> = fn(&mut S, &A) -> bool;

/// Centralized state store with Redux-like reducer pattern
///
/// The store is the only owner of the state. External code reads through
/// [`Store::state`] and selectors, and changes it through [`Store::dispatch`].
///
/// # Type Parameters
/// * `S` - The root state type, a struct of [`Slice`](crate::Slice)s
/// * `A` - The action type (must implement `Action`)
/// * `M` - Middleware observing every dispatched action
///
/// # Example
/// ```ignore
/// struct State {
///     cart: Slice<Vec<String>>,
/// }
///
/// #[derive(Action, Clone, Debug)]
/// enum AppAction {
///     #[action(forward)]
///     Cart(CartAction),
/// }
///
/// fn reducer(state: &mut State, action: &AppAction) -> bool {
///     match action {
///         AppAction::Cart(a) => state.cart.reduce(a, cart::reduce),
///     }
/// }
///
/// let mut store = Store::new(State::default(), reducer);
/// store.dispatch(AppAction::Cart(CartAction::Add("tote".into())));
/// ```
pub struct Store<S, A: Action, M: Middleware<A> = NoopMiddleware> {
    state: S,
    reducer: Reducer<S, A>,
    middleware: M,
    watchers: Vec<(SubscriptionId, Box<dyn Watcher<S, A>>)>,
    next_subscription: u64,
}

impl<S, A: Action> Store<S, A, NoopMiddleware> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self::with_middleware(state, reducer, NoopMiddleware)
    }
}

impl<S, A: Action, M: Middleware<A>> Store<S, A, M> {
    /// Create a new store with middleware
    pub fn with_middleware(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            state,
            reducer,
            middleware,
            watchers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Dispatch an action to the store
    ///
    /// Applies the reducer, notifies subscriptions whose selected value
    /// changed, and processes any follow-up actions they queued (depth-first)
    /// before returning. Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        self.dispatch_at(action, 0)
    }

    fn dispatch_at(&mut self, action: A, depth: usize) -> bool {
        if depth > MAX_DISPATCH_DEPTH {
            tracing::warn!(
                action = %action.name(),
                depth,
                "Dropping follow-up action: dispatch nested too deeply"
            );
            return false;
        }

        self.middleware.before(&action);
        let changed = (self.reducer)(&mut self.state, &action);

        let mut follow_ups = Dispatcher::new();
        if changed {
            for (_, watcher) in &mut self.watchers {
                watcher.check(&self.state, &mut follow_ups);
            }
        }

        self.middleware.after(&action, changed);

        for next in follow_ups.queue {
            self.dispatch_at(next, depth + 1);
        }
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    /// Number of active subscriptions
    pub fn subscription_count(&self) -> usize {
        self.watchers.len()
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.watchers.retain(|(existing, _)| *existing != id);
    }
}

impl<S: 'static, A: Action, M: Middleware<A>> Store<S, A, M> {
    /// Subscribe to a selector.
    ///
    /// `notify` runs after a dispatch only when the selector's output is a
    /// different reference than the one last delivered. The current value
    /// is recorded at subscription time and is not delivered.
    pub fn subscribe<I, V, F>(
        &mut self,
        selector: Rc<Selector<S, I, V>>,
        notify: F,
    ) -> SubscriptionId
    where
        I: Inputs + 'static,
        V: 'static,
        F: FnMut(&Arc<V>, &mut Dispatcher<A>) + 'static,
    {
        let last = selector.select(&self.state);
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.watchers.push((
            id,
            Box::new(Watch {
                selector,
                last,
                notify,
            }),
        ));
        id
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Queue of follow-up actions raised by subscription callbacks.
#[derive(Debug)]
pub struct Dispatcher<A> {
    queue: Vec<A>,
}

impl<A> Dispatcher<A> {
    fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queue an action; it is dispatched before the current dispatch returns.
    pub fn dispatch(&mut self, action: A) {
        self.queue.push(action);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

trait Watcher<S, A> {
    fn check(&mut self, state: &S, dispatcher: &mut Dispatcher<A>);
}

struct Watch<S, I, V, F> {
    selector: Rc<Selector<S, I, V>>,
    last: Arc<V>,
    notify: F,
}

impl<S, A, I, V, F> Watcher<S, A> for Watch<S, I, V, F>
where
    I: Inputs,
    F: FnMut(&Arc<V>, &mut Dispatcher<A>),
{
    fn check(&mut self, state: &S, dispatcher: &mut Dispatcher<A>) {
        let current = self.selector.select(state);
        if !Arc::ptr_eq(&current, &self.last) {
            self.last = current;
            (self.notify)(&self.last, dispatcher);
        }
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, effects, or other
/// cross-cutting concerns to your store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Two middleware in sequence
impl<A: Action, M1: Middleware<A>, M2: Middleware<A>> Middleware<A> for (M1, M2) {
    fn before(&mut self, action: &A) {
        self.0.before(action);
        self.1.before(action);
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        // Call in reverse order for proper nesting
        self.1.after(action, state_changed);
        self.0.after(action, state_changed);
    }
}
