pub mod auth;
pub mod config;
pub mod i18n;
pub mod pages;
pub mod security;
pub mod server;
pub mod usage;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::StaticTokenAuth;
use crate::config::Config;
use crate::i18n::{CatalogStore, DirCatalogStore, EmbeddedCatalogStore, LocaleRegistry, LocaleResolver};
use crate::server::AppState;
use crate::usage::PendingUsageStore;

/// Build the locale resolver described by the configuration.
pub fn build_resolver(config: &Config) -> Result<LocaleResolver> {
    let registry = LocaleRegistry::new(&config.supported_locales, &config.default_locale)
        .context("Invalid locale configuration")?;

    let store: Arc<dyn CatalogStore> = match &config.messages_dir {
        Some(dir) => {
            info!("Loading catalogs from {}", dir.display());
            Arc::new(DirCatalogStore::new(dir))
        }
        None => {
            info!("Using embedded catalogs");
            Arc::new(EmbeddedCatalogStore)
        }
    };

    Ok(LocaleResolver::new(Arc::new(registry), store))
}

/// Assemble the shared request state from configuration.
pub fn build_state(config: &Config) -> Result<AppState> {
    let resolver = build_resolver(config)?;

    if config.api_tokens.is_empty() {
        warn!("No API_TOKENS configured, every usage request will be rejected");
    }

    Ok(AppState {
        resolver: Arc::new(resolver),
        auth: Arc::new(StaticTokenAuth::new(config.api_tokens.clone())),
        usage_store: Arc::new(PendingUsageStore),
    })
}
