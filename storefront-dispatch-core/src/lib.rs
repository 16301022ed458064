//! Core traits and types for storefront-dispatch
//!
//! A reactive state/effect engine: typed actions, pure slice reducers,
//! memoized selectors and an async effect runner, plus a carousel rotation
//! scheduler and a display price deriver.
//!
//! # Core Concepts
//!
//! - **Action**: Closed enum of events; result actions follow the
//!   `Load<Noun>Success` / `Load<Noun>Failure` vocabulary
//! - **Slice**: Named `Arc` partition of state, replaced structurally by its reducer
//! - **Store**: Owns the state, applies the root reducer, notifies subscriptions
//! - **Selector**: Derived values memoized on input identity
//! - **EffectRunner**: Turns actions into async jobs whose results re-enter as actions
//!
//! # Basic Example
//!
//! ```ignore
//! use storefront_dispatch_core::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! enum CartAction {
//!     Add(u32),
//!     ResetCart,
//! }
//!
//! fn cart(state: &Vec<u32>, action: &CartAction) -> Option<Vec<u32>> {
//!     match action {
//!         CartAction::Add(id) => Some(state.iter().copied().chain([*id]).collect()),
//!         CartAction::ResetCart if state.is_empty() => None,
//!         CartAction::ResetCart => Some(Vec::new()),
//!     }
//! }
//!
//! struct AppState {
//!     cart: Slice<Vec<u32>>,
//! }
//!
//! fn reducer(state: &mut AppState, action: &CartAction) -> bool {
//!     state.cart.reduce(action, cart)
//! }
//!
//! let mut store = Store::new(AppState { cart: Slice::new("cart", Vec::new()) }, reducer);
//! store.dispatch(CartAction::Add(7));
//! ```
//!
//! # Effects
//!
//! Intent actions start async jobs; each job ends in exactly one result action.
//!
//! ```ignore
//! let mut runtime = Runtime::new(AppState::default(), reducer);
//! runtime.effects_mut().register(effect::from_fn("offers", |action: &Action| match action {
//!     Action::LoadOffers => Some(Job::new(
//!         "offers",
//!         fetch_offers(api.clone()),
//!         Action::LoadOffersFailure,
//!     )),
//!     _ => None,
//! }));
//!
//! runtime.dispatch(Action::LoadOffers);
//! runtime.settle().await;
//! ```

pub mod action;
pub mod effect;
pub mod logger;
pub mod price;
pub mod rotation;
pub mod runtime;
pub mod selector;
pub mod slice;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionPhase, ActionSummary};

// Store exports
pub use slice::{LoadState, OperationState, OperationStatus, Slice, SliceReducer};
pub use store::{
    Dispatcher, Middleware, NoopMiddleware, Reducer, Store, SubscriptionId, MAX_DISPATCH_DEPTH,
};

// Selector exports
pub use selector::{Inputs, Selector};

// Effect exports
pub use effect::{Concurrency, Effect, EffectRunner, Job};
pub use runtime::{Runtime, RuntimeMiddleware};

// Logging exports
pub use logger::{
    glob_match, ActionLog, ActionLogConfig, ActionLogEntry, ActionLoggerConfig,
    ActionLoggerMiddleware,
};

pub use price::{round_money, DiscountDescriptor, DiscountKind, DisplayPrice, PriceTable};
pub use rotation::RotationScheduler;

// Testing exports
pub use testing::TestHarness;

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionPhase, ActionSummary};
    pub use crate::effect::{self, Concurrency, Effect, EffectRunner, Job};
    pub use crate::logger::{ActionLoggerConfig, ActionLoggerMiddleware};
    pub use crate::price::{DiscountDescriptor, DiscountKind, DisplayPrice, PriceTable};
    pub use crate::rotation::RotationScheduler;
    pub use crate::runtime::Runtime;
    pub use crate::selector::{Inputs, Selector};
    pub use crate::slice::{LoadState, OperationState, OperationStatus, Slice};
    pub use crate::store::{Dispatcher, Middleware, NoopMiddleware, Reducer, Store, SubscriptionId};
}
