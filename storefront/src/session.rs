//! Storefront session: runtime, selectors, carousel and document head
//!
//! A session owns everything that lives on the dispatching task. Store
//! subscriptions tie the pieces together:
//!
//! - changed hero slides restart the carousel
//! - new offer cards republish the title, meta description and JSON-LD
//! - a changed category filter reloads the product list
//!
//! ```ignore
//! let mut session = Session::new(&config, Arc::new(demo_catalogue()), Rc::new(TracingHead));
//! session.boot();
//! session.settle().await;
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use storefront_dispatch::{
    ActionLog, ActionLogConfig, ActionLoggerMiddleware, RotationScheduler, Runtime,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::api::DataSource;
use crate::config::StorefrontConfig;
use crate::effects;
use crate::i18n::{Catalog, Translate};
use crate::reducer::reducer;
use crate::selectors::{NewsletterView, OfferCard, Selectors};
use crate::seo::{self, DocumentHead};
use crate::slices::hero::HeroSlide;
use crate::slices::newsletter::NewsletterAction;
use crate::slices::products::{Product, ProductsAction};
use crate::state::StorefrontState;

/// Actions kept in the in-memory log
const ACTION_LOG_CAPACITY: usize = 256;

/// Structured data id for the offer catalog
pub const OFFER_CATALOG_ID: &str = "offer-catalog";

pub struct Session {
    runtime: Runtime<StorefrontState, Action>,
    selectors: Selectors,
    carousel: Rc<RefCell<RotationScheduler<HeroSlide>>>,
}

impl Session {
    /// Build a session. Must be called inside a tokio runtime.
    pub fn new(config: &StorefrontConfig, data: Arc<dyn DataSource>, head: Rc<dyn DocumentHead>) -> Self {
        let mut catalog = Catalog::english();
        catalog.merge(&config.translations);
        let i18n: Arc<dyn Translate> = Arc::new(catalog);

        let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::new(
            ACTION_LOG_CAPACITY,
            config.logging.clone(),
        ));
        let mut runtime = Runtime::with_logger(StorefrontState::seeded(), reducer, logger);
        runtime
            .effects_mut()
            .set_concurrency(config.effects.concurrency);
        effects::register(runtime.effects_mut(), data, Arc::clone(&i18n));

        let selectors = Selectors::new(config.pricing.table.clone());
        let carousel = Rc::new(RefCell::new(RotationScheduler::new()));
        let period = config.carousel.period();

        // The seeded slides rotate until the real ones arrive
        let seeded = selectors.hero_slides.select(runtime.state());
        carousel.borrow_mut().start(seeded.to_vec(), period);

        let rotation = Rc::clone(&carousel);
        let mut shown = seeded;
        runtime
            .store_mut()
            .subscribe(Rc::clone(&selectors.hero_slides), move |slides, _| {
                // A failed reload keeps the slides but replaces the slice
                if **slides == *shown {
                    return;
                }
                shown = Arc::clone(slides);
                tracing::debug!(slides = slides.len(), "restarting carousel");
                rotation.borrow_mut().start(slides.to_vec(), period);
            });

        let currency = config.pricing.currency.clone();
        let initial = selectors.offer_cards.select(runtime.state());
        publish_offers(&*head, &*i18n, &currency, &initial);
        runtime
            .store_mut()
            .subscribe(Rc::clone(&selectors.offer_cards), move |cards, _| {
                publish_offers(&*head, &*i18n, &currency, cards);
            });

        let mut category = Option::clone(&selectors.active_category.select(runtime.state()));
        runtime
            .store_mut()
            .subscribe(Rc::clone(&selectors.active_category), move |selected, dispatcher| {
                // Toggling other filter fields also produces a new value
                if **selected == category {
                    return;
                }
                category = Option::clone(selected);
                dispatcher.dispatch(
                    ProductsAction::LoadProducts {
                        category: category.clone(),
                    }
                    .into(),
                );
            });

        Self {
            runtime,
            selectors,
            carousel,
        }
    }

    /// Dispatch every content load.
    pub fn boot(&mut self) {
        let category = self.state().filters.get().category.clone();
        for action in Action::boot_sequence(category) {
            self.runtime.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) -> bool {
        self.runtime.dispatch(action.into())
    }

    pub fn subscribe_newsletter(&mut self, email: impl Into<String>) -> bool {
        self.dispatch(NewsletterAction::SubscribeNewsletter { email: email.into() })
    }

    /// Wait until every effect has delivered its result.
    pub async fn settle(&mut self) {
        self.runtime.settle().await;
    }

    /// Process actions until `shutdown` is cancelled.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        self.runtime.run(shutdown).await;
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.runtime.sender()
    }

    pub fn state(&self) -> &StorefrontState {
        self.runtime.state()
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn offer_cards(&self) -> Arc<Vec<OfferCard>> {
        self.selectors.offer_cards.select(self.state())
    }

    pub fn featured_offer(&self) -> Option<OfferCard> {
        Option::clone(&self.selectors.featured_offer.select(self.state()))
    }

    pub fn visible_products(&self) -> Arc<Vec<Product>> {
        self.selectors.visible_products.select(self.state())
    }

    pub fn newsletter(&self) -> Arc<NewsletterView> {
        self.selectors.newsletter_status.select(self.state())
    }

    pub fn carousel(&self) -> Ref<'_, RotationScheduler<HeroSlide>> {
        self.carousel.borrow()
    }

    pub fn current_slide(&self) -> Option<HeroSlide> {
        self.carousel.borrow().current_item().cloned()
    }

    pub fn next_slide(&self) {
        self.carousel.borrow_mut().next();
    }

    pub fn previous_slide(&self) {
        self.carousel.borrow_mut().previous();
    }

    /// Jump to a slide and restart the countdown.
    pub fn go_to_slide(&self, index: usize) {
        self.carousel.borrow_mut().go_to(index);
    }

    pub fn action_log(&self) -> Option<&ActionLog> {
        self.runtime.logger().log()
    }

    /// Stop the carousel timer.
    pub fn shutdown(&self) {
        self.carousel.borrow_mut().stop();
    }
}

fn publish_offers(head: &dyn DocumentHead, i18n: &dyn Translate, currency: &str, cards: &[OfferCard]) {
    let store = i18n.translate("store.name", &[]);
    let count = cards.len().to_string();
    head.set_title(&i18n.translate("seo.title", &[("store", &store)]));
    head.set_meta(
        "description",
        &i18n.translate("seo.description", &[("count", &count)]),
    );
    head.set_structured_data(OFFER_CATALOG_ID, &seo::offer_catalog(&store, cards, currency));
}
