//! Per-request locale resolution.
//!
//! Maps a requested locale (possibly absent, possibly unsupported) onto a
//! supported one and loads its catalog. Unsupported input is not an error
//! for the caller: it is logged and replaced by the default locale. A
//! missing catalog is.

use crate::i18n::{Catalog, CatalogError, CatalogStore, Locale, LocaleRegistry};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A locale together with its messages. Built per request, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocale {
    pub locale: Locale,
    pub messages: Catalog,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog for the resolved locale could not be loaded. This is a
    /// configuration problem; the request cannot be served.
    #[error("Catalog unavailable for locale '{locale}'")]
    CatalogUnavailable {
        locale: Locale,
        #[source]
        source: CatalogError,
    },
}

/// Resolves requested locales against an injected registry and catalog store.
#[derive(Clone)]
pub struct LocaleResolver {
    registry: Arc<LocaleRegistry>,
    store: Arc<dyn CatalogStore>,
}

impl LocaleResolver {
    pub fn new(registry: Arc<LocaleRegistry>, store: Arc<dyn CatalogStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Pick the locale to serve for a request, falling back to the default.
    pub fn select(&self, requested: Option<&str>) -> Locale {
        if let Some(locale) = requested.and_then(|tag| self.registry.get(tag)) {
            return locale.clone();
        }

        let fallback = self.registry.default_locale();
        warn!(
            requested = requested.unwrap_or("<none>"),
            fallback = %fallback,
            "Unsupported locale requested, using fallback"
        );
        fallback.clone()
    }

    /// Resolve a requested locale and load its catalog.
    ///
    /// # Returns
    /// * `Ok(ResolvedLocale)` for the requested locale, or the default one
    ///   when the request is absent or unsupported
    /// * `Err(ResolveError::CatalogUnavailable)` if the catalog of the
    ///   resolved locale cannot be loaded
    pub async fn resolve(&self, requested: Option<&str>) -> Result<ResolvedLocale, ResolveError> {
        let locale = self.select(requested);

        let messages = self
            .store
            .load(locale.as_str())
            .await
            .map_err(|source| ResolveError::CatalogUnavailable {
                locale: locale.clone(),
                source,
            })?;

        debug!("Resolved locale {} ({} messages)", locale, messages.len());

        Ok(ResolvedLocale { locale, messages })
    }
}
