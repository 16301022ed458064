//! Hero carousel slides

use serde::{Deserialize, Serialize};
use storefront_dispatch::LoadState;

use super::{load_failure, load_success};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlide {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_href: Option<String>,
    /// Display order, ascending
    #[serde(default)]
    pub position: i32,
}

pub type HeroState = LoadState<Vec<HeroSlide>>;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum HeroAction {
    LoadSlides,
    LoadSlidesSuccess(Vec<HeroSlide>),
    LoadSlidesFailure(String),
}

/// An empty slide table keeps the seeded slides.
pub fn reduce(state: &HeroState, action: &HeroAction) -> Option<HeroState> {
    match action {
        HeroAction::LoadSlides => None,
        HeroAction::LoadSlidesSuccess(slides) if slides.is_empty() => state.error.as_ref().map(|_| HeroState {
            data: state.data.clone(),
            error: None,
        }),
        HeroAction::LoadSlidesSuccess(slides) => load_success(state, slides),
        HeroAction::LoadSlidesFailure(error) => load_failure(state, error),
    }
}
