use serde::{Deserialize, Serialize};
use storefront_dispatch::LoadState;

use super::{load_failure, load_success};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: f64,
    /// Certified sustainable materials or production
    #[serde(default)]
    pub sustainable: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub type ProductsState = LoadState<Vec<Product>>;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum ProductsAction {
    /// Fetch the catalogue, optionally narrowed to one category on the backend
    LoadProducts { category: Option<String> },
    LoadProductsSuccess(Vec<Product>),
    LoadProductsFailure(String),
}

pub fn reduce(state: &ProductsState, action: &ProductsAction) -> Option<ProductsState> {
    match action {
        ProductsAction::LoadProducts { .. } => None,
        ProductsAction::LoadProductsSuccess(products) => load_success(state, products),
        ProductsAction::LoadProductsFailure(error) => load_failure(state, error),
    }
}
