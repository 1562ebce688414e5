//! Internationalization (i18n) module.
//!
//! Everything needed to turn a requested locale into a catalog of
//! localized strings lives here.
//!
//! # Architecture
//!
//! - `locale`: validated `Locale` tag type
//! - `registry`: immutable set of supported locales and the default one
//! - `catalog`: message catalogs and the stores they are loaded from
//! - `resolver`: per-request resolution with fallback to the default locale
//! - `validator`: catalog consistency checks run at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use blog_site::i18n::{EmbeddedCatalogStore, LocaleRegistry, LocaleResolver};
//!
//! let resolver = LocaleResolver::new(
//!     Arc::new(LocaleRegistry::default()),
//!     Arc::new(EmbeddedCatalogStore),
//! );
//!
//! // "en" is not served, so this yields the Slovak catalog
//! let resolved = resolver.resolve(Some("en")).await?;
//! assert_eq!(resolved.locale.as_str(), "sk");
//! ```

mod catalog;
mod locale;
mod registry;
mod resolver;
mod validator;

pub use catalog::{Catalog, CatalogError, CatalogStore, DirCatalogStore, EmbeddedCatalogStore};
pub use locale::{Locale, LocaleError};
pub use registry::{LocaleRegistry, DEFAULT_LOCALE};
pub use resolver::{LocaleResolver, ResolveError, ResolvedLocale};
pub use validator::{CatalogValidator, ValidationReport};

/// Catalog keys the blog page renders.
pub const BLOG_PAGE_KEYS: &[&str] = &["Pages.blog.title", "Pages.blog.content"];

/// Load and check the catalog of every supported locale.
///
/// Every catalog must contain [`BLOG_PAGE_KEYS`]; non-default catalogs are
/// compared against the default one. Load failures are reported as errors.
pub async fn validate_catalogs(resolver: &LocaleResolver) -> ValidationReport {
    let mut report = ValidationReport::new();
    let registry = resolver.registry();

    let reference = match resolver.resolve(Some(registry.default_locale().as_str())).await {
        Ok(resolved) => Some(resolved.messages),
        Err(e) => {
            report.errors.push(e.to_string());
            None
        }
    };

    for locale in registry.list() {
        let catalog = match resolver.resolve(Some(locale.as_str())).await {
            Ok(resolved) => resolved.messages,
            Err(e) => {
                if locale != registry.default_locale() {
                    report.errors.push(e.to_string());
                }
                continue;
            }
        };

        let mut found = CatalogValidator::require_keys(&catalog, BLOG_PAGE_KEYS);
        if let Some(reference) = reference.as_ref().filter(|_| locale != registry.default_locale()) {
            found.merge(CatalogValidator::compare(reference, &catalog));
        }

        report.errors.extend(found.errors.into_iter().map(|e| format!("[{}] {}", locale, e)));
        report
            .warnings
            .extend(found.warnings.into_iter().map(|w| format!("[{}] {}", locale, w)));
    }

    report
}
