//! Request authentication.
//!
//! Handlers never look at credentials themselves: they ask an
//! [`AuthProvider`] for the user behind a request.

use crate::security::constant_time_compare;
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Opaque user identifier issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The provider itself failed; distinct from "no user".
#[derive(Debug, Error)]
#[error("Auth provider failure: {0}")]
pub struct AuthError(pub String);

/// Resolves the user behind a request.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// # Returns
    /// * `Ok(Some(user))` for an authenticated request
    /// * `Ok(None)` when no valid credentials are present
    /// * `Err` when the provider could not decide
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<UserId>, AuthError>;
}

/// Bearer tokens configured up front, each mapped to a user.
#[derive(Clone, Default)]
pub struct StaticTokenAuth {
    tokens: Vec<(String, UserId)>,
}

impl StaticTokenAuth {
    pub fn new(tokens: Vec<(String, UserId)>) -> Self {
        Self { tokens }
    }

    /// Find the user for a presented token.
    ///
    /// Every configured token is compared so lookup time does not depend on
    /// which entry matched.
    fn lookup(&self, presented: &str) -> Option<UserId> {
        let mut found = None;
        for (token, user) in &self.tokens {
            if constant_time_compare(token, presented) && found.is_none() {
                found = Some(user.clone());
            }
        }
        found
    }
}

impl fmt::Debug for StaticTokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenAuth")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<UserId>, AuthError> {
        let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            debug!("No Authorization header");
            return Ok(None);
        };

        let Some(token) = value.strip_prefix("Bearer ").map(str::trim) else {
            debug!("Authorization header is not a bearer token");
            return Ok(None);
        };

        if token.is_empty() {
            return Ok(None);
        }

        Ok(self.lookup(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn provider() -> StaticTokenAuth {
        StaticTokenAuth::new(vec![
            ("token-alice".to_string(), UserId::new("alice")),
            ("token-bob".to_string(), UserId::new("bob")),
        ])
    }

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let user = provider()
            .authenticate(&headers_with("Bearer token-bob"))
            .await
            .unwrap();
        assert_eq!(user, Some(UserId::new("bob")));
    }

    #[tokio::test]
    async fn test_token_whitespace_is_trimmed() {
        let user = provider()
            .authenticate(&headers_with("Bearer   token-alice "))
            .await
            .unwrap();
        assert_eq!(user, Some(UserId::new("alice")));
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthenticated() {
        let user = provider().authenticate(&HeaderMap::new()).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthenticated() {
        let user = provider()
            .authenticate(&headers_with("Bearer token-mallory"))
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_unauthenticated() {
        let user = provider()
            .authenticate(&headers_with("Basic dG9rZW4tYWxpY2U="))
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_empty_bearer_is_unauthenticated() {
        let user = provider().authenticate(&headers_with("Bearer ")).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_no_configured_tokens_rejects_everything() {
        let user = StaticTokenAuth::default()
            .authenticate(&headers_with("Bearer anything"))
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_debug_does_not_leak_tokens() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("token-alice"));
        assert!(debug.contains("2"));
    }
}
