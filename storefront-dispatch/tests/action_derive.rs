use storefront_dispatch::{Action, ActionPhase, ActionSummary};

#[derive(Action, Clone, Debug, PartialEq)]
enum HeroAction {
    LoadSlides,
    LoadSlidesSuccess(Vec<String>),
    LoadSlidesFailure(String),
}

#[derive(Action, Clone, Debug, PartialEq)]
enum NewsletterAction {
    SubscribeNewsletter { email: String },
    SubscribeNewsletterSuccess { message: String },
    SubscribeNewsletterFailure { error: String },
    ResetNewsletterState,
    #[action(phase = "success")]
    Confirmed,
}

#[derive(Action, Clone, Debug, PartialEq)]
#[action(summary)]
enum AppAction {
    #[action(forward)]
    Hero(HeroAction),
    #[action(forward)]
    Newsletter(NewsletterAction),
    #[action(phase = "reset")]
    ClearAll,
    Tick,
}

#[test]
fn test_names_are_variant_names() {
    assert_eq!(HeroAction::LoadSlides.name(), "LoadSlides");
    assert_eq!(HeroAction::LoadSlidesSuccess(vec![]).name(), "LoadSlidesSuccess");
    assert_eq!(
        NewsletterAction::SubscribeNewsletter {
            email: "a@b.co".into()
        }
        .name(),
        "SubscribeNewsletter"
    );
}

#[test]
fn test_phase_inference() {
    assert_eq!(HeroAction::LoadSlides.phase(), ActionPhase::Intent);
    assert_eq!(HeroAction::LoadSlidesSuccess(vec![]).phase(), ActionPhase::Success);
    assert_eq!(HeroAction::LoadSlidesFailure("x".into()).phase(), ActionPhase::Failure);
    assert_eq!(NewsletterAction::ResetNewsletterState.phase(), ActionPhase::Reset);
    assert_eq!(
        NewsletterAction::SubscribeNewsletterFailure {
            error: "taken".into()
        }
        .phase(),
        ActionPhase::Failure
    );
}

#[test]
fn test_phase_override() {
    assert_eq!(NewsletterAction::Confirmed.phase(), ActionPhase::Success);
    assert_eq!(AppAction::ClearAll.phase(), ActionPhase::Reset);
    assert_eq!(AppAction::Tick.phase(), ActionPhase::Intent);
}

#[test]
fn test_forward_delegates_to_slice_action() {
    let action = AppAction::Hero(HeroAction::LoadSlidesSuccess(vec!["spring".into()]));
    assert_eq!(action.name(), "LoadSlidesSuccess");
    assert_eq!(action.phase(), ActionPhase::Success);

    let action = AppAction::Newsletter(NewsletterAction::ResetNewsletterState);
    assert_eq!(action.name(), "ResetNewsletterState");
    assert_eq!(action.phase(), ActionPhase::Reset);
    assert!(!action.phase().is_result());
}

#[test]
fn test_summary_uses_debug() {
    let action = AppAction::Hero(HeroAction::LoadSlidesFailure("timeout".into()));
    assert_eq!(action.summary(), "Hero(LoadSlidesFailure(\"timeout\"))");
}
