//! Newsletter subscription (`idle -> loading -> {success, error} -> idle`)

use storefront_dispatch::OperationState;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum NewsletterAction {
    SubscribeNewsletter { email: String },
    SubscribeNewsletterSuccess { message: String },
    SubscribeNewsletterFailure { error: String },
    ResetNewsletterState,
}

/// A second subscribe while loading keeps `loading`; results outside
/// `loading` and resets outside `success`/`error` are ignored.
pub fn reduce(state: &OperationState, action: &NewsletterAction) -> Option<OperationState> {
    match action {
        NewsletterAction::SubscribeNewsletter { .. } => state.begin(),
        NewsletterAction::SubscribeNewsletterSuccess { message } => state.succeed(message.as_str()),
        NewsletterAction::SubscribeNewsletterFailure { error } => state.fail(error.as_str()),
        NewsletterAction::ResetNewsletterState => state.reset(),
    }
}
