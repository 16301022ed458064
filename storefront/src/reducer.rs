//! Root reducer: routes each action to the slice that owns it

use crate::action::Action;
use crate::slices::{filters, footer, hero, newsletter, offers, products, sustainability};
use crate::state::StorefrontState;

/// Returns `true` if the owning slice was replaced. Every other slice keeps
/// its reference.
pub fn reducer(state: &mut StorefrontState, action: &Action) -> bool {
    match action {
        Action::Hero(a) => state.hero.reduce(a, hero::reduce),
        Action::Footer(a) => state.footer.reduce(a, footer::reduce),
        Action::Offers(a) => state.offers.reduce(a, offers::reduce),
        Action::Products(a) => state.products.reduce(a, products::reduce),
        Action::Filters(a) => state.filters.reduce(a, filters::reduce),
        Action::Sustainability(a) => state.sustainability.reduce(a, sustainability::reduce),
        Action::Newsletter(a) => state.newsletter.reduce(a, newsletter::reduce),
    }
}
