//! Translation collaborator
//!
//! Pure key lookup with `{param}` substitution. A missing key renders as the
//! key itself, so untranslated strings stay visible instead of disappearing.

use std::collections::HashMap;

pub trait Translate: Send + Sync {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// In-memory key → template catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English strings used by the effects and document head.
    pub fn english() -> Self {
        Self::from_entries([
            ("newsletter.success", "Thanks for subscribing, {email}!"),
            ("newsletter.invalid_email", "Please enter a valid email address."),
            ("newsletter.already_subscribed", "{email} is already subscribed."),
            ("footer.tagline", "Made to last, built to be repaired."),
            ("sustainability.headline", "Our commitment"),
            ("seo.title", "{store} | Outdoor gear made to last"),
            ("seo.description", "Shop {count} current offers on responsibly made outdoor gear."),
            ("store.name", "Northfield Outfitters"),
        ])
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Add or replace entries, e.g. from the `[translations]` config table.
    pub fn merge(&mut self, overrides: &HashMap<String, String>) {
        self.entries
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.entries.get(key) else {
            tracing::trace!(key, "missing translation");
            return key.to_string();
        };
        params.iter().fold(template.clone(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}
