//! Root storefront state: one [`Slice`] per section

use storefront_dispatch::{LoadState, OperationState, Slice};

use crate::fixtures;
use crate::slices::filters::CatalogFilter;
use crate::slices::footer::FooterState;
use crate::slices::hero::HeroState;
use crate::slices::offers::OffersState;
use crate::slices::products::ProductsState;
use crate::slices::sustainability::SustainabilityState;

#[derive(Debug, Clone)]
pub struct StorefrontState {
    pub hero: Slice<HeroState>,
    pub footer: Slice<FooterState>,
    pub offers: Slice<OffersState>,
    pub products: Slice<ProductsState>,
    pub filters: Slice<CatalogFilter>,
    pub sustainability: Slice<SustainabilityState>,
    pub newsletter: Slice<OperationState>,
}

impl StorefrontState {
    /// Initial state with the static sections pre-filled.
    pub fn seeded() -> Self {
        Self {
            hero: Slice::new("hero", LoadState::seeded(fixtures::seed_slides())),
            footer: Slice::new("footer", LoadState::seeded(fixtures::seed_footer())),
            sustainability: Slice::new(
                "sustainability",
                LoadState::seeded(fixtures::seed_sustainability()),
            ),
            ..Self::empty()
        }
    }

    /// Initial state with nothing seeded
    pub fn empty() -> Self {
        Self {
            hero: Slice::new("hero", LoadState::default()),
            footer: Slice::new("footer", LoadState::default()),
            offers: Slice::new("offers", LoadState::default()),
            products: Slice::new("products", LoadState::default()),
            filters: Slice::new("filters", CatalogFilter::default()),
            sustainability: Slice::new("sustainability", LoadState::default()),
            newsletter: Slice::new("newsletter", OperationState::default()),
        }
    }
}

impl Default for StorefrontState {
    fn default() -> Self {
        Self::seeded()
    }
}
