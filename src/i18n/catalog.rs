//! Message catalogs and the stores they are loaded from.
//!
//! Catalog files are nested JSON objects; leaves must be strings. Keys are
//! flattened with `.` so `{"Pages": {"blog": {"title": "…"}}}` is looked up
//! as `Pages.blog.title`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No catalog for locale '{0}'")]
    NotFound(String),

    #[error("Failed to read catalog for locale '{locale}': {source}")]
    Io {
        locale: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed catalog for locale '{locale}': {reason}")]
    Format { locale: String, reason: String },
}

/// Mapping from translation key to localized string, for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    messages: BTreeMap<String, String>,
}

impl Catalog {
    /// Parse a nested JSON catalog document.
    ///
    /// `locale` is only used for error reporting.
    pub fn from_json(locale: &str, source: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(source).map_err(|e| CatalogError::Format {
            locale: locale.to_string(),
            reason: e.to_string(),
        })?;

        let Value::Object(root) = value else {
            return Err(CatalogError::Format {
                locale: locale.to_string(),
                reason: "top level must be an object".to_string(),
            });
        };

        let mut messages = BTreeMap::new();
        for (key, child) in root {
            flatten_into(locale, key, child, &mut messages)?;
        }

        Ok(Self { messages })
    }

    /// Get the localized string for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

fn flatten_into(
    locale: &str,
    path: String,
    value: Value,
    out: &mut BTreeMap<String, String>,
) -> Result<(), CatalogError> {
    match value {
        Value::String(text) => {
            out.insert(path, text);
            Ok(())
        }
        Value::Object(children) => {
            for (key, child) in children {
                flatten_into(locale, format!("{}.{}", path, key), child, out)?;
            }
            Ok(())
        }
        _ => Err(CatalogError::Format {
            locale: locale.to_string(),
            reason: format!("value at '{}' is not a string", path),
        }),
    }
}

/// Source of message catalogs, keyed by locale tag.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the catalog for a locale.
    async fn load(&self, locale: &str) -> Result<Catalog, CatalogError>;
}

/// Reads `<dir>/<locale>.json` on every call.
#[derive(Debug, Clone)]
pub struct DirCatalogStore {
    dir: PathBuf,
}

impl DirCatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CatalogStore for DirCatalogStore {
    async fn load(&self, locale: &str) -> Result<Catalog, CatalogError> {
        let path = self.dir.join(format!("{}.json", locale));
        debug!("Loading catalog from {}", path.display());

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(locale.to_string()))
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    locale: locale.to_string(),
                    source,
                })
            }
        };

        Catalog::from_json(locale, &source)
    }
}

/// Catalogs shipped inside the binary.
const EMBEDDED_CATALOGS: &[(&str, &str)] = &[("sk", include_str!("../../messages/sk.json"))];

/// Serves the catalogs compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogStore;

#[async_trait]
impl CatalogStore for EmbeddedCatalogStore {
    async fn load(&self, locale: &str) -> Result<Catalog, CatalogError> {
        let (_, source) = EMBEDDED_CATALOGS
            .iter()
            .find(|(tag, _)| *tag == locale)
            .ok_or_else(|| CatalogError::NotFound(locale.to_string()))?;

        Catalog::from_json(locale, source)
    }
}
