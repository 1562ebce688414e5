//! Locale registry: the set of locales the site is served in.
//!
//! The registry is an immutable value built once at startup and passed to
//! whoever needs it, instead of a process-wide list.

use crate::i18n::{Locale, LocaleError};

/// Tag of the built-in default locale.
pub const DEFAULT_LOCALE: &str = "sk";

/// Immutable, ordered set of supported locales plus the default one.
///
/// Invariants: non-empty, no duplicates, default is a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRegistry {
    locales: Vec<Locale>,
    default: Locale,
}

impl LocaleRegistry {
    /// Build a registry from locale tags.
    ///
    /// # Arguments
    /// * `tags` - Supported locale tags, in display order
    /// * `default` - Tag of the fallback locale (must be one of `tags`)
    pub fn new<S: AsRef<str>>(tags: &[S], default: &str) -> Result<Self, LocaleError> {
        if tags.is_empty() {
            return Err(LocaleError::EmptySet);
        }

        let mut locales: Vec<Locale> = Vec::with_capacity(tags.len());
        for tag in tags {
            let locale = Locale::parse(tag.as_ref())?;
            if locales.contains(&locale) {
                return Err(LocaleError::Duplicate(locale.to_string()));
            }
            locales.push(locale);
        }

        let default = Locale::parse(default)?;
        if !locales.contains(&default) {
            return Err(LocaleError::DefaultNotSupported(default.to_string()));
        }

        Ok(Self { locales, default })
    }

    /// Look up a supported locale by tag.
    pub fn get(&self, tag: &str) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.as_str() == tag)
    }

    /// All supported locales, in configured order.
    pub fn list(&self) -> &[Locale] {
        &self.locales
    }

    /// The fallback locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }
}

impl Default for LocaleRegistry {
    /// The built-in set: Slovak only.
    fn default() -> Self {
        let sk = Locale::parse(DEFAULT_LOCALE).expect("built-in locale tag is valid");
        Self {
            locales: vec![sk.clone()],
            default: sk,
        }
    }
}
