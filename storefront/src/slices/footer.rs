use serde::{Deserialize, Serialize};
use storefront_dispatch::LoadState;

use super::{load_failure, load_success};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
    /// Column heading the link is listed under
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FooterContent {
    pub tagline: String,
    pub links: Vec<FooterLink>,
}

impl FooterContent {
    /// Links of one group, in display order
    pub fn group(&self, group: &str) -> Vec<&FooterLink> {
        let mut links: Vec<&FooterLink> = self.links.iter().filter(|l| l.group == group).collect();
        links.sort_by_key(|l| l.position);
        links
    }
}

pub type FooterState = LoadState<FooterContent>;

#[derive(storefront_dispatch::Action, Clone, Debug, PartialEq)]
pub enum FooterAction {
    LoadFooter,
    LoadFooterSuccess(FooterContent),
    LoadFooterFailure(String),
}

pub fn reduce(state: &FooterState, action: &FooterAction) -> Option<FooterState> {
    match action {
        FooterAction::LoadFooter => None,
        FooterAction::LoadFooterSuccess(content) => load_success(state, content),
        FooterAction::LoadFooterFailure(error) => load_failure(state, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(label: &str, group: &str, position: i32) -> FooterLink {
        FooterLink {
            label: label.into(),
            href: format!("/{}", label.to_lowercase()),
            group: group.into(),
            position,
        }
    }

    #[test]
    fn test_group_orders_links() {
        let content = FooterContent {
            tagline: String::new(),
            links: vec![link("Returns", "help", 2), link("About", "company", 1), link("Shipping", "help", 1)],
        };
        let help: Vec<&str> = content.group("help").iter().map(|l| l.label.as_str()).collect();
        assert_eq!(help, vec!["Shipping", "Returns"]);
    }

    #[test]
    fn test_reduce() {
        let state = FooterState::seeded(FooterContent::default());
        let loaded = FooterContent {
            tagline: "Made to last".into(),
            links: vec![link("About", "company", 1)],
        };

        let next = reduce(&state, &FooterAction::LoadFooterSuccess(loaded.clone())).unwrap();
        assert_eq!(next.data, Some(loaded));

        let failed = reduce(&next, &FooterAction::LoadFooterFailure("503".into())).unwrap();
        assert!(failed.is_loaded());
        assert_eq!(failed.error.as_deref(), Some("503"));
    }
}
