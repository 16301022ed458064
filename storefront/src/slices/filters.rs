//! Catalogue filter selection

use crate::slices::products::Product;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogFilter {
    /// Selected category tag; `None` shows every category
    pub category: Option<String>,
    pub sustainable_only: bool,
}

impl CatalogFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category = self
            .category
            .as_deref()
            .map_or(true, |c| product.category.eq_ignore_ascii_case(c));
        category && (!self.sustainable_only || product.sustainable)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Category tags are stored lowercase; a blank tag means no category.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase)
}

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum FilterAction {
    SetCategory(Option<String>),
    ToggleSustainableOnly,
    ResetFilterState,
}

pub fn reduce(state: &CatalogFilter, action: &FilterAction) -> Option<CatalogFilter> {
    match action {
        FilterAction::SetCategory(category) => {
            let category = normalize_category(category.as_deref());
            if category == state.category {
                return None;
            }
            Some(CatalogFilter {
                category,
                ..state.clone()
            })
        }
        FilterAction::ToggleSustainableOnly => Some(CatalogFilter {
            sustainable_only: !state.sustainable_only,
            ..state.clone()
        }),
        FilterAction::ResetFilterState if state.is_default() => None,
        FilterAction::ResetFilterState => Some(CatalogFilter::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: &str, sustainable: bool) -> Product {
        Product {
            id: 1,
            name: "Rain shell".into(),
            description: String::new(),
            category: category.into(),
            price: 120.0,
            sustainable,
            image_url: None,
        }
    }

    #[test]
    fn test_matches() {
        let filter = CatalogFilter {
            category: Some("Outerwear".into()),
            sustainable_only: true,
        };
        assert!(filter.matches(&product("outerwear", true)));
        assert!(!filter.matches(&product("outerwear", false)));
        assert!(!filter.matches(&product("footwear", true)));
        assert!(CatalogFilter::default().matches(&product("footwear", false)));
    }

    #[test]
    fn test_set_same_category_is_not_a_change() {
        let state = CatalogFilter {
            category: Some("footwear".into()),
            sustainable_only: false,
        };
        assert_eq!(reduce(&state, &FilterAction::SetCategory(Some("footwear".into()))), None);

        let cleared = reduce(&state, &FilterAction::SetCategory(None)).unwrap();
        assert_eq!(cleared.category, None);
    }

    #[test]
    fn test_set_category_normalizes_tag() {
        let state = CatalogFilter::default();
        let set = reduce(&state, &FilterAction::SetCategory(Some(" Footwear ".into()))).unwrap();
        assert_eq!(set.category.as_deref(), Some("footwear"));

        assert_eq!(reduce(&set, &FilterAction::SetCategory(Some("FOOTWEAR".into()))), None);
        assert_eq!(reduce(&state, &FilterAction::SetCategory(Some("  ".into()))), None);
    }

    #[test]
    fn test_toggle_and_reset() {
        let state = CatalogFilter::default();
        assert_eq!(reduce(&state, &FilterAction::ResetFilterState), None);

        let toggled = reduce(&state, &FilterAction::ToggleSustainableOnly).unwrap();
        assert!(toggled.sustainable_only);

        let reset = reduce(&toggled, &FilterAction::ResetFilterState).unwrap();
        assert!(reset.is_default());
    }
}
