//! Catalog check binary - validates the configured message catalogs without
//! starting the server
//!
//! Usage:
//!   cargo run --bin check-catalogs
//!
//! Reads the same environment as the server:
//! - SUPPORTED_LOCALES (defaults to sk)
//! - DEFAULT_LOCALE (defaults to sk)
//! - MESSAGES_DIR (embedded catalogs when unset)

use anyhow::Result;
use blog_site::{build_resolver, config, i18n};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("check_catalogs=info".parse()?)
                .add_directive("blog_site=warn".parse()?),
        )
        .init();

    let config = config::Config::from_env()?;
    let resolver = build_resolver(&config)?;

    let locales: Vec<String> = resolver.registry().list().iter().map(|l| l.to_string()).collect();
    info!("Checking catalogs for: {}", locales.join(", "));

    let report = i18n::validate_catalogs(&resolver).await;

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    for err in &report.errors {
        error!("{}", err);
    }

    if report.has_errors() {
        anyhow::bail!("{} catalog error(s)", report.errors.len());
    }

    info!("✓ All catalogs valid ({} warning(s))", report.warnings.len());
    Ok(())
}
