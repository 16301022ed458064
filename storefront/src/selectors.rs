//! Memoized projections of the storefront state
//!
//! Every selector is keyed on the identity of the slice `Arc`s it reads, so
//! a dispatch that leaves a slice untouched never recomputes its views.

use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use storefront_dispatch::{DisplayPrice, OperationState, OperationStatus, PriceTable, Selector};

use crate::slices::filters::CatalogFilter;
use crate::slices::hero::{HeroSlide, HeroState};
use crate::slices::offers::{Offer, OffersState};
use crate::slices::products::{Product, ProductsState};
use crate::state::StorefrontState;

/// An offer with its derived display price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferCard {
    pub offer: Offer,
    pub price: DisplayPrice,
}

/// What the newsletter form renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterView {
    pub status: OperationStatus,
    /// Success message or error, whichever is current
    pub notice: Option<String>,
    pub can_submit: bool,
}

pub type StoreSelector<I, V> = Rc<Selector<StorefrontState, I, V>>;

/// The storefront's selector set. Clone the `Rc`s to subscribe.
pub struct Selectors {
    pub hero_slides: StoreSelector<Arc<HeroState>, Vec<HeroSlide>>,
    pub offer_cards: StoreSelector<Arc<OffersState>, Vec<OfferCard>>,
    pub featured_offer: StoreSelector<Arc<Vec<OfferCard>>, Option<OfferCard>>,
    pub visible_products: StoreSelector<(Arc<ProductsState>, Arc<CatalogFilter>), Vec<Product>>,
    pub active_category: StoreSelector<Arc<CatalogFilter>, Option<String>>,
    pub newsletter_status: StoreSelector<Arc<OperationState>, NewsletterView>,
}

impl Selectors {
    pub fn new(prices: PriceTable) -> Self {
        let offer_cards = Rc::new(Selector::new(
            "offer_cards",
            |s: &StorefrontState| Arc::clone(s.offers.get()),
            move |offers: &Arc<OffersState>| offer_cards(offers, &prices),
        ));

        Self {
            hero_slides: Rc::new(Selector::new(
                "hero_slides",
                |s: &StorefrontState| Arc::clone(s.hero.get()),
                |hero: &Arc<HeroState>| ordered_slides(hero),
            )),
            featured_offer: Rc::new(Rc::clone(&offer_cards).map("featured_offer", |cards| featured_offer(cards))),
            offer_cards,
            visible_products: Rc::new(Selector::new(
                "visible_products",
                |s: &StorefrontState| (Arc::clone(s.products.get()), Arc::clone(s.filters.get())),
                |(products, filter): &(Arc<ProductsState>, Arc<CatalogFilter>)| {
                    visible_products(products, filter)
                },
            )),
            active_category: Rc::new(Selector::new(
                "active_category",
                |s: &StorefrontState| Arc::clone(s.filters.get()),
                |filter: &Arc<CatalogFilter>| filter.category.clone(),
            )),
            newsletter_status: Rc::new(Selector::new(
                "newsletter_status",
                |s: &StorefrontState| Arc::clone(s.newsletter.get()),
                |op: &Arc<OperationState>| newsletter_view(op),
            )),
        }
    }
}

fn ordered_slides(hero: &HeroState) -> Vec<HeroSlide> {
    let mut slides = hero.data.clone().unwrap_or_default();
    slides.sort_by_key(|s| s.position);
    slides
}

fn offer_cards(offers: &OffersState, prices: &PriceTable) -> Vec<OfferCard> {
    offers
        .data
        .iter()
        .flatten()
        .map(|offer| OfferCard {
            price: prices.derive(&offer.discount),
            offer: offer.clone(),
        })
        .collect()
}

/// The offer flagged as featured, else the one with the deepest discount.
fn featured_offer(cards: &[OfferCard]) -> Option<OfferCard> {
    cards
        .iter()
        .find(|card| card.offer.featured)
        .or_else(|| {
            cards
                .iter()
                .filter(|card| card.price.is_discounted())
                .max_by_key(|card| card.price.percentage)
        })
        .cloned()
}

fn visible_products(products: &ProductsState, filter: &CatalogFilter) -> Vec<Product> {
    products
        .data
        .iter()
        .flatten()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect()
}

fn newsletter_view(op: &OperationState) -> NewsletterView {
    NewsletterView {
        status: op.status,
        notice: op.message.clone().or_else(|| op.error.clone()),
        can_submit: !op.is_loading(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::reducer::reducer;
    use crate::slices::filters::FilterAction;
    use crate::slices::newsletter::NewsletterAction;
    use crate::slices::offers::OffersAction;
    use crate::slices::products::ProductsAction;
    use storefront_dispatch::{DiscountDescriptor, DiscountKind};

    fn offer(id: u64, kind: DiscountKind, value: f64, featured: bool) -> Offer {
        Offer {
            id,
            title: format!("Offer {id}"),
            description: String::new(),
            image_url: None,
            discount: DiscountDescriptor::new(kind, value, "generic"),
            featured,
            valid_until: None,
        }
    }

    fn product(id: u64, category: &str, sustainable: bool) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            category: category.into(),
            price: 50.0,
            sustainable,
            image_url: None,
        }
    }

    fn apply(state: &mut StorefrontState, action: impl Into<Action>) {
        reducer(state, &action.into());
    }

    #[test]
    fn test_hero_slides_ordered_and_memoized() {
        let selectors = Selectors::new(PriceTable::default());
        let state = StorefrontState::seeded();

        let first = selectors.hero_slides.select(&state);
        let again = selectors.hero_slides.select(&state);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(selectors.hero_slides.recomputations(), 1);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_offer_cards_derive_prices() {
        let selectors = Selectors::new(PriceTable::new(100.0, 5.0));
        let mut state = StorefrontState::seeded();
        apply(
            &mut state,
            OffersAction::LoadOffersSuccess(vec![
                offer(1, DiscountKind::Percentage, 20.0, false),
                offer(2, DiscountKind::FixedAmount, 30.0, false),
            ]),
        );

        let cards = selectors.offer_cards.select(&state);
        assert_eq!(cards[0].price.discounted, 80.0);
        assert_eq!(cards[1].price.percentage, 30);
    }

    #[test]
    fn test_featured_offer_prefers_flag_then_depth() {
        let selectors = Selectors::new(PriceTable::new(100.0, 5.0));
        let mut state = StorefrontState::seeded();
        apply(
            &mut state,
            OffersAction::LoadOffersSuccess(vec![
                offer(1, DiscountKind::Percentage, 10.0, false),
                offer(2, DiscountKind::Percentage, 40.0, false),
            ]),
        );
        let featured = selectors.featured_offer.select(&state);
        assert_eq!((*featured).as_ref().map(|c| c.offer.id), Some(2));

        apply(
            &mut state,
            OffersAction::LoadOffersSuccess(vec![
                offer(1, DiscountKind::Percentage, 10.0, true),
                offer(2, DiscountKind::Percentage, 40.0, false),
            ]),
        );
        let featured = selectors.featured_offer.select(&state);
        assert_eq!((*featured).as_ref().map(|c| c.offer.id), Some(1));
    }

    #[test]
    fn test_unrelated_dispatch_keeps_views() {
        let selectors = Selectors::new(PriceTable::default());
        let mut state = StorefrontState::seeded();
        apply(&mut state, OffersAction::LoadOffersSuccess(vec![offer(1, DiscountKind::Other, 0.0, false)]));

        let cards = selectors.offer_cards.select(&state);
        let featured = selectors.featured_offer.select(&state);

        apply(&mut state, FilterAction::ToggleSustainableOnly);
        apply(
            &mut state,
            NewsletterAction::SubscribeNewsletter {
                email: "a@example.com".into(),
            },
        );

        assert!(Arc::ptr_eq(&cards, &selectors.offer_cards.select(&state)));
        assert!(Arc::ptr_eq(&featured, &selectors.featured_offer.select(&state)));
        assert_eq!(selectors.offer_cards.recomputations(), 1);
    }

    #[test]
    fn test_visible_products_follow_filters() {
        let selectors = Selectors::new(PriceTable::default());
        let mut state = StorefrontState::seeded();
        apply(
            &mut state,
            ProductsAction::LoadProductsSuccess(vec![
                product(1, "outerwear", true),
                product(2, "outerwear", false),
                product(3, "footwear", true),
            ]),
        );
        assert_eq!(selectors.visible_products.select(&state).len(), 3);

        apply(&mut state, FilterAction::SetCategory(Some("outerwear".into())));
        assert_eq!(selectors.visible_products.select(&state).len(), 2);

        apply(&mut state, FilterAction::ToggleSustainableOnly);
        let visible = selectors.visible_products.select(&state);
        assert_eq!(visible.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            selectors.active_category.select(&state).as_deref(),
            Some("outerwear")
        );
    }

    #[test]
    fn test_not_yet_loaded_is_empty() {
        let selectors = Selectors::new(PriceTable::default());
        let state = StorefrontState::seeded();
        assert!(selectors.offer_cards.select(&state).is_empty());
        assert!(selectors.featured_offer.select(&state).is_none());
        assert!(selectors.visible_products.select(&state).is_empty());
    }

    #[test]
    fn test_newsletter_view() {
        let selectors = Selectors::new(PriceTable::default());
        let mut state = StorefrontState::seeded();
        assert!(selectors.newsletter_status.select(&state).can_submit);

        apply(
            &mut state,
            NewsletterAction::SubscribeNewsletter {
                email: "a@example.com".into(),
            },
        );
        let view = selectors.newsletter_status.select(&state);
        assert_eq!(view.status, OperationStatus::Loading);
        assert!(!view.can_submit);

        apply(
            &mut state,
            NewsletterAction::SubscribeNewsletterFailure {
                error: "taken".into(),
            },
        );
        assert_eq!(selectors.newsletter_status.select(&state).notice.as_deref(), Some("taken"));
    }
}
