//! Root action: the sum of every slice's closed action enum
//!
//! Each variant forwards `name()` and `phase()` to the wrapped slice action,
//! so logs and filters see `LoadOffersSuccess`, not `Offers`.

use storefront_dispatch::ActionSummary;

use crate::slices::filters::FilterAction;
use crate::slices::footer::FooterAction;
use crate::slices::hero::HeroAction;
use crate::slices::newsletter::NewsletterAction;
use crate::slices::offers::OffersAction;
use crate::slices::products::ProductsAction;
use crate::slices::sustainability::SustainabilityAction;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum Action {
    #[action(forward)]
    Hero(HeroAction),
    #[action(forward)]
    Footer(FooterAction),
    #[action(forward)]
    Offers(OffersAction),
    #[action(forward)]
    Products(ProductsAction),
    #[action(forward)]
    Filters(FilterAction),
    #[action(forward)]
    Sustainability(SustainabilityAction),
    #[action(forward)]
    Newsletter(NewsletterAction),
}

macro_rules! from_slice_action {
    ($($variant:ident($slice:ty)),* $(,)?) => {
        $(
            impl From<$slice> for Action {
                fn from(action: $slice) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

from_slice_action! {
    Hero(HeroAction),
    Footer(FooterAction),
    Offers(OffersAction),
    Products(ProductsAction),
    Filters(FilterAction),
    Sustainability(SustainabilityAction),
    Newsletter(NewsletterAction),
}

impl Action {
    /// Every content load the storefront performs on boot
    pub fn boot_sequence(category: Option<String>) -> Vec<Action> {
        vec![
            HeroAction::LoadSlides.into(),
            FooterAction::LoadFooter.into(),
            OffersAction::LoadOffers.into(),
            ProductsAction::LoadProducts { category }.into(),
            SustainabilityAction::LoadSustainability.into(),
        ]
    }
}

/// Record lists are summarized by count; email addresses are masked.
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::Hero(HeroAction::LoadSlidesSuccess(slides)) => {
                format!("LoadSlidesSuccess({} slides)", slides.len())
            }
            Action::Offers(OffersAction::LoadOffersSuccess(offers)) => {
                format!("LoadOffersSuccess({} offers)", offers.len())
            }
            Action::Products(ProductsAction::LoadProductsSuccess(products)) => {
                format!("LoadProductsSuccess({} products)", products.len())
            }
            Action::Footer(FooterAction::LoadFooterSuccess(content)) => {
                format!("LoadFooterSuccess({} links)", content.links.len())
            }
            Action::Sustainability(SustainabilityAction::LoadSustainabilitySuccess(content)) => {
                format!("LoadSustainabilitySuccess({} pillars)", content.pillars.len())
            }
            Action::Newsletter(NewsletterAction::SubscribeNewsletter { email }) => {
                format!("SubscribeNewsletter {{ email: {:?} }}", mask_email(email))
            }
            Action::Hero(action) => format!("{:?}", action),
            Action::Footer(action) => format!("{:?}", action),
            Action::Offers(action) => format!("{:?}", action),
            Action::Products(action) => format!("{:?}", action),
            Action::Filters(action) => format!("{:?}", action),
            Action::Sustainability(action) => format!("{:?}", action),
            Action::Newsletter(action) => format!("{:?}", action),
        }
    }
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
