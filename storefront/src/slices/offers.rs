//! Promotional offers

use serde::{Deserialize, Serialize};
use storefront_dispatch::{DiscountDescriptor, LoadState};

use super::{load_failure, load_success};

/// A promotion as stored by the backend.
///
/// The discount columns (`discount_type`, `discount_value`, `category`) are
/// flattened into [`DiscountDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub discount: DiscountDescriptor,
    #[serde(default)]
    pub featured: bool,
    /// ISO date the promotion ends, if any
    #[serde(default)]
    pub valid_until: Option<String>,
}

pub type OffersState = LoadState<Vec<Offer>>;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum OffersAction {
    LoadOffers,
    LoadOffersSuccess(Vec<Offer>),
    LoadOffersFailure(String),
}

pub fn reduce(state: &OffersState, action: &OffersAction) -> Option<OffersState> {
    match action {
        OffersAction::LoadOffers => None,
        OffersAction::LoadOffersSuccess(offers) => load_success(state, offers),
        OffersAction::LoadOffersFailure(error) => load_failure(state, error),
    }
}
