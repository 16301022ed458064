//! storefront-dispatch: reactive state and effects for storefront front-ends
//!
//! Like Redux, but with closed action enums, `Arc` slices and selectors
//! memoized on reference identity. Reducers are pure; all async work goes
//! through the effect runner and re-enters as result actions.
//!
//! # Example
//! ```ignore
//! use storefront_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum OffersAction {
//!     LoadOffers,
//!     LoadOffersSuccess(Vec<Offer>),
//!     LoadOffersFailure(String),
//! }
//!
//! assert_eq!(OffersAction::LoadOffers.phase(), ActionPhase::Intent);
//! assert!(OffersAction::LoadOffersFailure("timeout".into()).phase().is_result());
//! ```

// Re-export everything from core
pub use storefront_dispatch_core::*;

// Re-export derive macros
pub use storefront_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    pub use storefront_dispatch_core::prelude::*;

    // Derive macros
    pub use storefront_dispatch_macros::Action;
}
