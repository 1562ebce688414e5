use anyhow::Result;
use blog_site::{build_state, config, i18n, server};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blog_site=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Starting blog site");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    let state = build_state(&config)?;

    // A locale we cannot serve is a configuration error: refuse to start
    info!("Checking message catalogs");
    let report = i18n::validate_catalogs(&state.resolver).await;
    for warning in &report.warnings {
        warn!("Catalog warning: {}", warning);
    }
    if report.has_errors() {
        anyhow::bail!("Catalog validation failed: {}", report.errors.join("; "));
    }
    info!(
        "✓ Catalogs OK for {} locale(s), default '{}'",
        state.resolver.registry().list().len(),
        state.resolver.registry().default_locale()
    );

    server::serve(config.socket_addr(), state).await
}
