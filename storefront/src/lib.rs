//! Storefront state engine
//!
//! Feature slices for the storefront sections, the effects that load them,
//! memoized view selectors, and a [`Session`] that wires them to the hero
//! carousel and the document head.

pub mod action;
pub mod api;
pub mod config;
pub mod effects;
pub mod fixtures;
pub mod i18n;
pub mod reducer;
pub mod selectors;
pub mod seo;
pub mod session;
pub mod slices;
pub mod state;

pub use action::Action;
pub use api::{DataError, DataSource, Filters, MemoryDataSource, Record, RestDataSource};
pub use config::{ConfigError, StorefrontConfig};
pub use i18n::{Catalog, Translate};
pub use selectors::{NewsletterView, OfferCard, Selectors};
pub use seo::{DocumentHead, RecordingHead, TracingHead};
pub use session::Session;
pub use state::StorefrontState;
