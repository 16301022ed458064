//! Display price derivation from raw discount descriptors
//!
//! [`PriceTable::derive`] is pure and total: every descriptor maps to a
//! [`DisplayPrice`] whose fields are non-negative with `discounted <= original`.
//!
//! | kind | original | discounted | percentage |
//! |---|---|---|---|
//! | `percentage` | category base price | `original * (1 - value/100)` | `value` rounded |
//! | `fixed_amount` | category base price | `max(0, original - value)` | saved share of `original` |
//! | `free_shipping` | shipping baseline | `0` | `100` |
//! | anything else | category base price | `original` | `0` |
//!
//! Input values are clamped rather than rejected: percentages to `[0, 100]`,
//! fixed amounts to `>= 0`, and NaN or infinite values count as `0`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discount rule kind. Unknown kinds deserialize as [`DiscountKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
    FreeShipping,
    #[default]
    #[serde(other)]
    Other,
}

/// Raw promotional price rule, as stored by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountDescriptor {
    #[serde(alias = "discount_type")]
    pub kind: DiscountKind,
    #[serde(alias = "discount_value", default)]
    pub value: f64,
    #[serde(default)]
    pub category: String,
}

impl DiscountDescriptor {
    pub fn new(kind: DiscountKind, value: f64, category: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayPrice {
    pub original: f64,
    pub discounted: f64,
    pub percentage: u32,
}

impl DisplayPrice {
    /// Amount saved, rounded to cents
    pub fn savings(&self) -> f64 {
        round_money(self.original - self.discounted)
    }

    pub fn is_discounted(&self) -> bool {
        self.discounted < self.original
    }
}

/// Base prices keyed by coarse category tag.
///
/// Loaded from configuration; see [`PriceTable::default`] for the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub categories: BTreeMap<String, f64>,
    pub default_price: f64,
    pub shipping_baseline: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        let categories = [("generic", 100.0), ("seasonal", 150.0), ("flash_sale", 80.0)]
            .into_iter()
            .map(|(tag, price)| (tag.to_string(), price))
            .collect();
        Self {
            categories,
            default_price: 100.0,
            shipping_baseline: 9.99,
        }
    }
}

impl PriceTable {
    pub fn new(default_price: f64, shipping_baseline: f64) -> Self {
        Self {
            categories: BTreeMap::new(),
            default_price,
            shipping_baseline,
        }
    }

    pub fn with_category(mut self, tag: impl Into<String>, price: f64) -> Self {
        self.categories.insert(tag.into(), price);
        self
    }

    /// Base price for a category tag, ignoring ASCII case.
    pub fn base_price(&self, category: &str) -> f64 {
        let tag = category.trim();
        self.categories
            .get(tag)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(tag))
                    .map(|(_, price)| price)
            })
            .copied()
            .unwrap_or(self.default_price)
    }

    /// Derive the display price triple for a descriptor.
    pub fn derive(&self, descriptor: &DiscountDescriptor) -> DisplayPrice {
        let value = finite_or_zero(descriptor.value);

        match descriptor.kind {
            DiscountKind::Percentage => {
                let original = self.money(self.base_price(&descriptor.category));
                let rate = value.clamp(0.0, 100.0);
                DisplayPrice {
                    original,
                    discounted: round_money(original * (1.0 - rate / 100.0)),
                    percentage: rate.round() as u32,
                }
            }
            DiscountKind::FixedAmount => {
                let original = self.money(self.base_price(&descriptor.category));
                let discounted = round_money((original - value.max(0.0)).max(0.0));
                let percentage = if original > 0.0 {
                    ((original - discounted) / original * 100.0).round() as u32
                } else {
                    0
                };
                DisplayPrice {
                    original,
                    discounted,
                    percentage,
                }
            }
            DiscountKind::FreeShipping => DisplayPrice {
                original: self.money(self.shipping_baseline),
                discounted: 0.0,
                percentage: 100,
            },
            DiscountKind::Other => {
                let original = self.money(self.base_price(&descriptor.category));
                DisplayPrice {
                    original,
                    discounted: original,
                    percentage: 0,
                }
            }
        }
    }

    fn money(&self, amount: f64) -> f64 {
        round_money(finite_or_zero(amount).max(0.0))
    }
}

/// Round to two decimals, half-up for non-negative amounts.
///
/// Values like `1.005` whose binary form sits just below the midpoint still round up.
pub fn round_money(amount: f64) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    let scaled = amount * 100.0;
    let nudged = scaled + scaled.abs() * f64::EPSILON * 4.0;
    nudged.round() / 100.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> PriceTable {
        PriceTable::new(100.0, 4.95)
            .with_category("generic", 100.0)
            .with_category("budget", 20.0)
            .with_category("Seasonal", 150.0)
    }

    #[test]
    fn test_percentage() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::Percentage, 20.0, "generic"));
        assert_eq!(
            price,
            DisplayPrice {
                original: 100.0,
                discounted: 80.0,
                percentage: 20,
            }
        );
    }

    #[test]
    fn test_fixed_amount() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::FixedAmount, 30.0, "generic"));
        assert_eq!(price.original, 100.0);
        assert_eq!(price.discounted, 70.0);
        assert_eq!(price.percentage, 30);
    }

    #[test]
    fn test_fixed_amount_floors_at_zero() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::FixedAmount, 30.0, "budget"));
        assert_eq!(price.original, 20.0);
        assert_eq!(price.discounted, 0.0);
        assert_eq!(price.percentage, 100);
    }

    #[test]
    fn test_free_shipping_uses_baseline() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::FreeShipping, 0.0, "generic"));
        assert_eq!(
            price,
            DisplayPrice {
                original: 4.95,
                discounted: 0.0,
                percentage: 100,
            }
        );
    }

    #[test]
    fn test_other_kind_is_undiscounted() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::Other, 50.0, "mystery"));
        assert_eq!(price.original, 100.0);
        assert_eq!(price.discounted, 100.0);
        assert_eq!(price.percentage, 0);
        assert!(!price.is_discounted());
    }

    #[test]
    fn test_out_of_range_percentages_clamp() {
        let t = table();
        let over = t.derive(&DiscountDescriptor::new(DiscountKind::Percentage, 140.0, "generic"));
        assert_eq!((over.discounted, over.percentage), (0.0, 100));

        let under = t.derive(&DiscountDescriptor::new(DiscountKind::Percentage, -15.0, "generic"));
        assert_eq!((under.discounted, under.percentage), (100.0, 0));

        let nan = t.derive(&DiscountDescriptor::new(DiscountKind::Percentage, f64::NAN, "generic"));
        assert_eq!((nan.discounted, nan.percentage), (100.0, 0));
    }

    #[test]
    fn test_negative_fixed_amount_is_no_discount() {
        let price = table().derive(&DiscountDescriptor::new(DiscountKind::FixedAmount, -10.0, "generic"));
        assert_eq!(price.discounted, 100.0);
        assert_eq!(price.percentage, 0);
    }

    #[test]
    fn test_zero_base_price() {
        let t = PriceTable::new(0.0, 0.0);
        let price = t.derive(&DiscountDescriptor::new(DiscountKind::FixedAmount, 5.0, "any"));
        assert_eq!(price, DisplayPrice::default());
    }

    #[test]
    fn test_base_price_lookup_ignores_case() {
        let t = table();
        assert_eq!(t.base_price("seasonal"), 150.0);
        assert_eq!(t.base_price("GENERIC"), 100.0);
        assert_eq!(t.base_price(" budget "), 20.0);
        assert_eq!(t.base_price("unknown"), 100.0);
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(1.005), 1.01);
        assert_eq!(round_money(2.675), 2.68);
        assert_eq!(round_money(19.994), 19.99);
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_percentage_rounds_to_cents() {
        let t = PriceTable::new(19.99, 0.0);
        let price = t.derive(&DiscountDescriptor::new(DiscountKind::Percentage, 33.3, "x"));
        // 19.99 * 0.667 = 13.33333
        assert_eq!(price.discounted, 13.33);
        assert_eq!(price.percentage, 33);
    }

    #[test]
    fn test_descriptor_from_json() {
        let descriptor: DiscountDescriptor =
            serde_json::from_str(r#"{"discount_type": "fixed_amount", "discount_value": 12.5, "category": "seasonal"}"#)
                .unwrap();
        assert_eq!(descriptor.kind, DiscountKind::FixedAmount);
        assert_eq!(descriptor.value, 12.5);

        let unknown: DiscountDescriptor =
            serde_json::from_str(r#"{"kind": "buy_one_get_one", "value": 1}"#).unwrap();
        assert_eq!(unknown.kind, DiscountKind::Other);
        assert_eq!(unknown.category, "");
    }

    #[test]
    fn test_table_from_toml() {
        let t: PriceTable = toml::from_str(
            r#"
            default_price = 60.0
            shipping_baseline = 5.0

            [categories]
            flash_sale = 45.0
            "#,
        )
        .unwrap();
        assert_eq!(t.base_price("FLASH_SALE"), 45.0);
        assert_eq!(t.base_price("generic"), 60.0);
        assert_eq!(t.shipping_baseline, 5.0);
    }

    fn kind() -> impl Strategy<Value = DiscountKind> {
        prop_oneof![
            Just(DiscountKind::Percentage),
            Just(DiscountKind::FixedAmount),
            Just(DiscountKind::FreeShipping),
            Just(DiscountKind::Other),
        ]
    }

    proptest! {
        #[test]
        fn prop_display_price_is_bounded(
            kind in kind(),
            value in prop_oneof![-1e6f64..1e6, Just(f64::NAN), Just(f64::INFINITY)],
            base in 0f64..10_000.0,
        ) {
            let t = PriceTable::new(base, 7.5);
            let price = t.derive(&DiscountDescriptor::new(kind, value, "any"));

            prop_assert!(price.original >= 0.0);
            prop_assert!(price.discounted >= 0.0);
            prop_assert!(price.discounted <= price.original);
            prop_assert!(price.percentage <= 100);
        }

        #[test]
        fn prop_derive_is_deterministic(kind in kind(), value in 0f64..200.0, base in 0f64..500.0) {
            let t = PriceTable::new(base, 3.0);
            let descriptor = DiscountDescriptor::new(kind, value, "generic");
            prop_assert_eq!(t.derive(&descriptor), t.derive(&descriptor));
        }
    }
}
