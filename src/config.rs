use crate::auth::UserId;
use crate::i18n::DEFAULT_LOCALE;
use anyhow::{bail, Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_addr: IpAddr,
    pub port: u16,

    // i18n
    pub supported_locales: Vec<String>,
    pub default_locale: String,
    /// Directory of `<locale>.json` catalogs; embedded catalogs when unset
    pub messages_dir: Option<PathBuf>,

    // Auth
    pub api_tokens: Vec<(String, UserId)>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .map(|v| v.parse::<IpAddr>().context(format!("Invalid BIND_ADDR: {}", v)))
                .transpose()?
                .unwrap_or(IpAddr::from([0, 0, 0, 0])),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // i18n
            supported_locales: parse_locale_list(
                &std::env::var("SUPPORTED_LOCALES").unwrap_or_else(|_| DEFAULT_LOCALE.to_string()),
            ),
            default_locale: std::env::var("DEFAULT_LOCALE")
                .unwrap_or_else(|_| DEFAULT_LOCALE.to_string()),
            messages_dir: std::env::var("MESSAGES_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            // Auth
            api_tokens: parse_api_tokens(&std::env::var("API_TOKENS").unwrap_or_default())
                .context("Invalid API_TOKENS")?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Split a comma-separated locale list, dropping empty entries.
pub fn parse_locale_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `token:user_id` pairs separated by commas.
pub fn parse_api_tokens(raw: &str) -> Result<Vec<(String, UserId)>> {
    let mut tokens = Vec::new();

    for (index, entry) in raw.split(',').map(str::trim).enumerate() {
        if entry.is_empty() {
            continue;
        }

        let Some((token, user)) = entry.split_once(':') else {
            bail!("Entry {} is not in token:user_id form", index + 1);
        };
        let (token, user) = (token.trim(), user.trim());
        if token.is_empty() || user.is_empty() {
            bail!("Entry {} has an empty token or user id", index + 1);
        }

        tokens.push((token.to_string(), UserId::new(user)));
    }

    Ok(tokens)
}
