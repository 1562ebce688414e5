//! Locale type: validated locale tag.
//!
//! A `Locale` can only be constructed from a well-formed tag, so anything
//! holding one (the registry, a resolved context) never carries garbage.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while parsing locale tags or building a locale set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Invalid locale tag: '{0}'")]
    InvalidTag(String),

    #[error("Supported locale set is empty")]
    EmptySet,

    #[error("Duplicate locale in supported set: '{0}'")]
    Duplicate(String),

    #[error("Default locale '{0}' is not in the supported set")]
    DefaultNotSupported(String),
}

// language subtag, optionally followed by a region or script subtag
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-([A-Z]{2}|[A-Z][a-z]{3}))?$").expect("static regex is valid")
    })
}

/// A validated locale tag (e.g. "sk", "en-US").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parse a locale tag.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the tag is well-formed
    /// * `Err(LocaleError::InvalidTag)` otherwise
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        if tag_regex().is_match(tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(LocaleError::InvalidTag(tag.to_string()))
        }
    }

    /// The locale tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
