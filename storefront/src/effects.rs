//! Effects: content loads and the newsletter subscription
//!
//! Each effect reacts to one intent, talks to the [`DataSource`] and comes
//! back with exactly one result action. Decode and backend errors become
//! the slice's failure action.

use std::sync::Arc;

use serde_json::Value;
use storefront_dispatch::effect::from_fn;
use storefront_dispatch::{EffectRunner, Job};

use crate::action::Action;
use crate::api::{fetch_as, resources, DataError, DataSource, Filters, Record};
use crate::i18n::Translate;
use crate::slices::filters::normalize_category;
use crate::slices::footer::{FooterAction, FooterContent, FooterLink};
use crate::slices::hero::{HeroAction, HeroSlide};
use crate::slices::newsletter::NewsletterAction;
use crate::slices::offers::{Offer, OffersAction};
use crate::slices::products::{Product, ProductsAction};
use crate::slices::sustainability::{SustainabilityAction, SustainabilityContent, SustainabilityPillar};

/// Register every storefront effect on `runner`.
pub fn register(runner: &mut EffectRunner<Action>, data: Arc<dyn DataSource>, i18n: Arc<dyn Translate>) {
    runner
        .register(hero_slides(Arc::clone(&data)))
        .register(footer(Arc::clone(&data), Arc::clone(&i18n)))
        .register(offers(Arc::clone(&data)))
        .register(products(Arc::clone(&data)))
        .register(sustainability(Arc::clone(&data), Arc::clone(&i18n)))
        .register(newsletter(data, i18n));
}

fn hero_slides(data: Arc<dyn DataSource>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::HERO_SLIDES, move |action: &Action| match action {
        Action::Hero(HeroAction::LoadSlides) => {
            let data = Arc::clone(&data);
            Some(Job::new(
                resources::HERO_SLIDES,
                async move {
                    let filters = Filters::new().order_by("position");
                    let slides: Vec<HeroSlide> = fetch_as(&*data, resources::HERO_SLIDES, &filters).await?;
                    Ok::<_, DataError>(Action::from(HeroAction::LoadSlidesSuccess(slides)))
                },
                |error| Action::from(HeroAction::LoadSlidesFailure(error)),
            ))
        }
        _ => None,
    })
}

fn footer(data: Arc<dyn DataSource>, i18n: Arc<dyn Translate>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::FOOTER_LINKS, move |action: &Action| match action {
        Action::Footer(FooterAction::LoadFooter) => {
            let data = Arc::clone(&data);
            let tagline = i18n.translate("footer.tagline", &[]);
            Some(Job::new(
                resources::FOOTER_LINKS,
                async move {
                    let filters = Filters::new().order_by("position");
                    let links: Vec<FooterLink> = fetch_as(&*data, resources::FOOTER_LINKS, &filters).await?;
                    Ok::<_, DataError>(Action::from(FooterAction::LoadFooterSuccess(FooterContent {
                        tagline,
                        links,
                    })))
                },
                |error| Action::from(FooterAction::LoadFooterFailure(error)),
            ))
        }
        _ => None,
    })
}

fn offers(data: Arc<dyn DataSource>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::OFFERS, move |action: &Action| match action {
        Action::Offers(OffersAction::LoadOffers) => {
            let data = Arc::clone(&data);
            Some(Job::new(
                resources::OFFERS,
                async move {
                    let filters = Filters::new().order_by("id");
                    let offers: Vec<Offer> = fetch_as(&*data, resources::OFFERS, &filters).await?;
                    Ok::<_, DataError>(Action::from(OffersAction::LoadOffersSuccess(offers)))
                },
                |error| Action::from(OffersAction::LoadOffersFailure(error)),
            ))
        }
        _ => None,
    })
}

fn products(data: Arc<dyn DataSource>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::PRODUCTS, move |action: &Action| match action {
        Action::Products(ProductsAction::LoadProducts { category }) => {
            let data = Arc::clone(&data);
            let mut filters = Filters::new().order_by("id");
            if let Some(category) = normalize_category(category.as_deref()) {
                filters = filters.eq("category", category);
            }
            Some(Job::new(
                resources::PRODUCTS,
                async move {
                    let products: Vec<Product> = fetch_as(&*data, resources::PRODUCTS, &filters).await?;
                    Ok::<_, DataError>(Action::from(ProductsAction::LoadProductsSuccess(products)))
                },
                |error| Action::from(ProductsAction::LoadProductsFailure(error)),
            ))
        }
        _ => None,
    })
}

fn sustainability(data: Arc<dyn DataSource>, i18n: Arc<dyn Translate>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::SUSTAINABILITY_PILLARS, move |action: &Action| match action {
        Action::Sustainability(SustainabilityAction::LoadSustainability) => {
            let data = Arc::clone(&data);
            let headline = i18n.translate("sustainability.headline", &[]);
            Some(Job::new(
                resources::SUSTAINABILITY_PILLARS,
                async move {
                    let filters = Filters::new().order_by("position");
                    let pillars: Vec<SustainabilityPillar> =
                        fetch_as(&*data, resources::SUSTAINABILITY_PILLARS, &filters).await?;
                    Ok::<_, DataError>(Action::from(SustainabilityAction::LoadSustainabilitySuccess(
                        SustainabilityContent { headline, pillars },
                    )))
                },
                |error| Action::from(SustainabilityAction::LoadSustainabilityFailure(error)),
            ))
        }
        _ => None,
    })
}

fn newsletter(data: Arc<dyn DataSource>, i18n: Arc<dyn Translate>) -> impl storefront_dispatch::Effect<Action> {
    from_fn(resources::NEWSLETTER_SUBSCRIBERS, move |action: &Action| match action {
        Action::Newsletter(NewsletterAction::SubscribeNewsletter { email }) => {
            let data = Arc::clone(&data);
            let i18n = Arc::clone(&i18n);
            let email = normalize_email(email);
            Some(Job::new(
                resources::NEWSLETTER_SUBSCRIBERS,
                async move { subscribe(&*data, &*i18n, email).await },
                |error| Action::from(NewsletterAction::SubscribeNewsletterFailure { error }),
            ))
        }
        _ => None,
    })
}

/// Errors are already user-facing text.
async fn subscribe(data: &dyn DataSource, i18n: &dyn Translate, email: String) -> Result<Action, String> {
    if !is_valid_email(&email) {
        return Err(i18n.translate("newsletter.invalid_email", &[]));
    }

    let mut fields = Record::new();
    fields.insert("email".to_string(), Value::String(email.clone()));

    match data.create_record(resources::NEWSLETTER_SUBSCRIBERS, fields).await {
        Ok(_) => {
            let message = i18n.translate("newsletter.success", &[("email", &email)]);
            Ok(NewsletterAction::SubscribeNewsletterSuccess { message }.into())
        }
        Err(DataError::Conflict { .. }) => Err(i18n.translate("newsletter.already_subscribed", &[("email", &email)])),
        Err(e) => Err(e.to_string()),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demo_catalogue;
    use crate::i18n::Catalog;
    use crate::reducer::reducer;
    use crate::state::StorefrontState;
    use storefront_dispatch::{
        assert_emitted, assert_not_emitted, find_emitted, Action as _, ActionPhase, OperationStatus, TestHarness,
    };

    fn harness(data: Arc<dyn DataSource>) -> TestHarness<StorefrontState, Action> {
        let mut harness = TestHarness::new(StorefrontState::seeded(), reducer);
        register(harness.effects_mut(), data, Arc::new(Catalog::english()));
        harness
    }

    fn subscribe_action(email: &str) -> Action {
        NewsletterAction::SubscribeNewsletter { email: email.into() }.into()
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("reader@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("reader"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("reader@example"));
        assert!(!is_valid_email("reader@@example.com"));
        assert!(!is_valid_email("read er@example.com"));
        assert!(!is_valid_email("reader@.com"));
    }

    #[tokio::test]
    async fn test_boot_loads_every_section() {
        let mut harness = harness(Arc::new(demo_catalogue()));
        for action in Action::boot_sequence(None) {
            harness.dispatch(action);
        }

        let emitted = harness.settle_emitted().await;
        assert_eq!(emitted.len(), 5);
        assert!(emitted.iter().all(|a| a.phase() == ActionPhase::Success));

        harness.apply(emitted);
        let state = harness.state();
        assert_eq!(state.hero.get().data.as_ref().map(Vec::len), Some(3));
        assert_eq!(state.offers.get().data.as_ref().map(Vec::len), Some(3));
        assert_eq!(state.products.get().data.as_ref().map(Vec::len), Some(5));
        let footer = state.footer.get().data.clone().unwrap_or_default();
        assert_eq!(footer.tagline, "Made to last, built to be repaired.");
        assert_eq!(footer.group("help").len(), 3);
        let sustainability = state.sustainability.get().data.clone().unwrap_or_default();
        assert_eq!(sustainability.pillars.len(), 4);
    }

    #[tokio::test]
    async fn test_products_narrowed_by_category() {
        let mut harness = harness(Arc::new(demo_catalogue()));
        harness.dispatch(
            ProductsAction::LoadProducts {
                category: Some("footwear".into()),
            }
            .into(),
        );

        let emitted = harness.settle_emitted().await;
        assert_emitted!(
            emitted,
            Action::Products(ProductsAction::LoadProductsSuccess(products))
                if products.len() == 2 && products.iter().all(|p| p.category == "footwear")
        );
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_failure_action() {
        let data = Arc::new(demo_catalogue());
        data.fail_resource(resources::OFFERS, "maintenance");
        let mut harness = harness(data.clone());

        harness.dispatch(OffersAction::LoadOffers.into());
        harness.dispatch(HeroAction::LoadSlides.into());
        let emitted = harness.settle_emitted().await;

        let failure = find_emitted!(emitted, Action::Offers(OffersAction::LoadOffersFailure(_)));
        match failure {
            Some(Action::Offers(OffersAction::LoadOffersFailure(error))) => {
                assert!(error.contains("503"));
                assert!(error.contains("maintenance"));
            }
            other => panic!("expected offers failure, got {other:?}"),
        }
        assert_emitted!(emitted, Action::Hero(HeroAction::LoadSlidesSuccess(_)));

        // The runner keeps working after a failure
        data.recover_resource(resources::OFFERS);
        harness.dispatch(OffersAction::LoadOffers.into());
        let emitted = harness.settle_emitted().await;
        assert_emitted!(emitted, Action::Offers(OffersAction::LoadOffersSuccess(_)));
    }

    #[tokio::test]
    async fn test_decode_error_is_failure() {
        let data = crate::api::MemoryDataSource::new().with_table(
            resources::OFFERS,
            vec![serde_json::json!({ "id": "not-a-number" })
                .as_object()
                .cloned()
                .unwrap()],
        );
        let mut harness = harness(Arc::new(data));

        harness.dispatch(OffersAction::LoadOffers.into());
        let emitted = harness.settle_emitted().await;
        assert_emitted!(
            emitted,
            Action::Offers(OffersAction::LoadOffersFailure(e)) if e.contains("decode")
        );
    }

    #[tokio::test]
    async fn test_newsletter_subscribe_and_duplicate() {
        let data = Arc::new(demo_catalogue());
        let mut harness = harness(data.clone());

        harness.dispatch(subscribe_action("  Reader@Example.com "));
        assert_eq!(harness.state().newsletter.get().status, OperationStatus::Loading);
        let emitted = harness.settle_emitted().await;
        assert_emitted!(
            emitted,
            Action::Newsletter(NewsletterAction::SubscribeNewsletterSuccess { message })
                if message == "Thanks for subscribing, reader@example.com!"
        );
        harness.apply(emitted);
        assert_eq!(harness.state().newsletter.get().status, OperationStatus::Success);
        assert_eq!(data.rows(resources::NEWSLETTER_SUBSCRIBERS).len(), 1);

        harness.dispatch(NewsletterAction::ResetNewsletterState.into());
        harness.dispatch(subscribe_action("reader@example.com"));
        let emitted = harness.settle_emitted().await;
        assert_emitted!(
            emitted,
            Action::Newsletter(NewsletterAction::SubscribeNewsletterFailure { error })
                if error == "reader@example.com is already subscribed."
        );
        assert_not_emitted!(emitted, Action::Newsletter(NewsletterAction::SubscribeNewsletterSuccess { .. }));
        assert_eq!(data.rows(resources::NEWSLETTER_SUBSCRIBERS).len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let data = Arc::new(demo_catalogue());
        let mut harness = harness(data.clone());

        harness.dispatch(subscribe_action("not-an-email"));
        let emitted = harness.settle_emitted().await;
        assert_emitted!(
            emitted,
            Action::Newsletter(NewsletterAction::SubscribeNewsletterFailure { error })
                if error == "Please enter a valid email address."
        );
        assert!(data.rows(resources::NEWSLETTER_SUBSCRIBERS).is_empty());

        harness.apply(emitted);
        let newsletter = harness.state().newsletter.get();
        assert_eq!(newsletter.status, OperationStatus::Error);
        assert_eq!(newsletter.error.as_deref(), Some("Please enter a valid email address."));
    }

    #[tokio::test]
    async fn test_filters_trigger_no_effect() {
        let mut harness = harness(Arc::new(demo_catalogue()));
        harness.dispatch(crate::slices::filters::FilterAction::ToggleSustainableOnly.into());
        assert!(harness.settle_emitted().await.is_empty());
    }
}
