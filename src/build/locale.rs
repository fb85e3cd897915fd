//! Recognized locales.
//!
//! Built once from config and passed by reference into the slug rules; never
//! mutated during a build pass.

use std::collections::BTreeSet;

use crate::config::LocaleConfig;

/// Collection name prefix for translated docs (`docs-de`, `docs-ja`, ...).
pub const LOCALE_COLLECTION_PREFIX: &str = "docs-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    default: String,
    codes: BTreeSet<String>,
}

impl Locales {
    pub fn new<I, S>(default: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: default.into(),
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &LocaleConfig) -> Self {
        Self::new(
            config.default.clone(),
            config.available.iter().map(|entry| entry.code.clone()),
        )
    }

    /// Locale of the plain `docs` collection.
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// The locale code of a `docs-<code>` collection, if `<code>` is configured.
    pub fn collection_locale<'a>(&self, collection: &'a str) -> Option<&'a str> {
        collection
            .strip_prefix(LOCALE_COLLECTION_PREFIX)
            .filter(|code| self.contains(code))
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::from_config(&LocaleConfig::default())
    }
}
