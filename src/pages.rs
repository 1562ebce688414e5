//! Server-rendered pages.

use crate::i18n::{Catalog, ResolveError};
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Catalog for '{locale}' has no message for '{key}'")]
    MissingMessage { locale: String, key: &'static str },
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("Failed to render page: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn message<'a>(catalog: &'a Catalog, locale: &str, key: &'static str) -> Result<&'a str, PageError> {
    catalog.get(key).ok_or_else(|| PageError::MissingMessage {
        locale: locale.to_string(),
        key,
    })
}

/// Render the blog landing page from a resolved catalog.
pub fn render_blog(locale: &str, catalog: &Catalog) -> Result<String, PageError> {
    let title = escape_html(message(catalog, locale, "Pages.blog.title")?);
    let content = escape_html(message(catalog, locale, "Pages.blog.content")?);

    Ok(format!(
        "<!DOCTYPE html>\n\
<html lang=\"{lang}\">\n\
<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
<body>\n<main>\n<h1>{title}</h1>\n<p>{content}</p>\n</main>\n</body>\n\
</html>\n",
        lang = escape_html(locale),
        title = title,
        content = content,
    ))
}

/// `GET /:locale/blog`
pub async fn blog(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Result<Html<String>, PageError> {
    let resolved = state.resolver.resolve(Some(&locale)).await?;
    let page = render_blog(resolved.locale.as_str(), &resolved.messages)?;
    Ok(Html(page))
}

/// `GET /` sends visitors to the default locale's blog.
pub async fn root(State(state): State<AppState>) -> Redirect {
    let locale = state.resolver.registry().default_locale();
    Redirect::temporary(&format!("/{}/blog", locale))
}
