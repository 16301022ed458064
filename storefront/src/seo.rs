//! Document/SEO collaborator
//!
//! Fire-and-forget: the engine sets title, meta tags and structured data but
//! never reads them back.

use std::cell::RefCell;

use serde_json::{json, Value};

use crate::selectors::OfferCard;

pub trait DocumentHead {
    fn set_title(&self, title: &str);
    fn set_meta(&self, name: &str, content: &str);
    fn set_structured_data(&self, id: &str, data: &Value);
}

/// Logs every head update through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHead;

impl DocumentHead for TracingHead {
    fn set_title(&self, title: &str) {
        tracing::info!(title, "document title");
    }

    fn set_meta(&self, name: &str, content: &str) {
        tracing::debug!(name, content, "document meta");
    }

    fn set_structured_data(&self, id: &str, data: &Value) {
        tracing::debug!(id, data = %data, "document structured data");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeadUpdate {
    Title(String),
    Meta { name: String, content: String },
    StructuredData { id: String, data: Value },
}

/// Records head updates for inspection in tests.
///
/// Single-threaded, like the store it is driven from.
#[derive(Debug, Default)]
pub struct RecordingHead {
    updates: RefCell<Vec<HeadUpdate>>,
}

impl RecordingHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<HeadUpdate> {
        self.updates.borrow().clone()
    }

    pub fn title(&self) -> Option<String> {
        self.updates().into_iter().rev().find_map(|u| match u {
            HeadUpdate::Title(title) => Some(title),
            _ => None,
        })
    }

    /// Latest structured data published under `id`
    pub fn structured_data(&self, id: &str) -> Option<Value> {
        self.updates().into_iter().rev().find_map(|u| match u {
            HeadUpdate::StructuredData { id: found, data } if found == id => Some(data),
            _ => None,
        })
    }

    fn push(&self, update: HeadUpdate) {
        self.updates.borrow_mut().push(update);
    }
}

impl DocumentHead for RecordingHead {
    fn set_title(&self, title: &str) {
        self.push(HeadUpdate::Title(title.to_string()));
    }

    fn set_meta(&self, name: &str, content: &str) {
        self.push(HeadUpdate::Meta {
            name: name.to_string(),
            content: content.to_string(),
        });
    }

    fn set_structured_data(&self, id: &str, data: &Value) {
        self.push(HeadUpdate::StructuredData {
            id: id.to_string(),
            data: data.clone(),
        });
    }
}

/// schema.org `OfferCatalog` for the current offer cards.
pub fn offer_catalog(store: &str, cards: &[OfferCard], currency: &str) -> Value {
    let items: Vec<Value> = cards
        .iter()
        .map(|card| {
            json!({
                "@type": "Offer",
                "name": card.offer.title,
                "description": card.offer.description,
                "price": card.price.discounted,
                "priceCurrency": currency,
                "priceValidUntil": card.offer.valid_until,
                "category": card.offer.discount.category,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "OfferCatalog",
        "name": store,
        "numberOfItems": items.len(),
        "itemListElement": items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::offers::Offer;
    use storefront_dispatch::{DiscountDescriptor, DiscountKind, DisplayPrice};

    #[test]
    fn test_recording_head_keeps_latest() {
        let head = RecordingHead::new();
        head.set_title("First");
        head.set_title("Second");
        head.set_structured_data("offers", &json!({"n": 1}));
        head.set_structured_data("offers", &json!({"n": 2}));

        assert_eq!(head.title().as_deref(), Some("Second"));
        assert_eq!(head.structured_data("offers"), Some(json!({"n": 2})));
        assert_eq!(head.structured_data("products"), None);
        assert_eq!(head.updates().len(), 4);
    }

    #[test]
    fn test_offer_catalog_shape() {
        let card = OfferCard {
            offer: Offer {
                id: 1,
                title: "Spring layering".into(),
                description: "20% off".into(),
                image_url: None,
                discount: DiscountDescriptor::new(DiscountKind::Percentage, 20.0, "seasonal"),
                featured: true,
                valid_until: Some("2026-06-30".into()),
            },
            price: DisplayPrice {
                original: 150.0,
                discounted: 120.0,
                percentage: 20,
            },
        };

        let data = offer_catalog("Northfield", &[card], "USD");
        assert_eq!(data["@type"], "OfferCatalog");
        assert_eq!(data["numberOfItems"], 1);
        assert_eq!(data["itemListElement"][0]["price"], 120.0);
        assert_eq!(data["itemListElement"][0]["priceValidUntil"], "2026-06-30");
    }
}
