use serde::{Deserialize, Serialize};
use storefront_dispatch::LoadState;

use super::{load_failure, load_success};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityPillar {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SustainabilityContent {
    pub headline: String,
    pub pillars: Vec<SustainabilityPillar>,
}

pub type SustainabilityState = LoadState<SustainabilityContent>;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum SustainabilityAction {
    LoadSustainability,
    LoadSustainabilitySuccess(SustainabilityContent),
    LoadSustainabilityFailure(String),
}

pub fn reduce(state: &SustainabilityState, action: &SustainabilityAction) -> Option<SustainabilityState> {
    match action {
        SustainabilityAction::LoadSustainability => None,
        SustainabilityAction::LoadSustainabilitySuccess(content) => load_success(state, content),
        SustainabilityAction::LoadSustainabilityFailure(error) => load_failure(state, error),
    }
}
