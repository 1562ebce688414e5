//! `POST /api/usage`: raise the caller's usage counter.
//!
//! The handler body is [`update_usage`], which returns a typed result; the
//! mapping to HTTP status codes lives only in the `IntoResponse` impls.

use crate::auth::{AuthError, AuthProvider, UserId};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::server::AppState;

/// Amount used when the request body does not specify one.
pub const DEFAULT_INCREMENT: i64 = 1;

/// One accepted usage update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageUpdate {
    pub user_id: UserId,
    pub increment: i64,
}

/// Request body. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct UsageRequest {
    #[serde(default)]
    increment: Option<i64>,
}

/// Durable storage for per-user usage counters.
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn increment(&self, update: &UsageUpdate) -> anyhow::Result<()>;
}

// TODO: replace with a database-backed store once the usage table exists.
/// Placeholder store: accepts every update and persists nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingUsageStore;

#[async_trait]
impl UsageStore for PendingUsageStore {
    async fn increment(&self, update: &UsageUpdate) -> anyhow::Result<()> {
        debug!(
            user_id = %update.user_id,
            increment = update.increment,
            "Usage persistence not implemented, dropping update"
        );
        Ok(())
    }
}

/// Successful response body.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UsageAck {
    pub message: &'static str,
    pub increment: i64,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
}

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("failed to read request body: {0}")]
    UnreadableBody(#[from] BytesRejection),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("failed to store usage: {0:#}")]
    Store(anyhow::Error),
}

impl IntoResponse for UsageError {
    fn into_response(self) -> Response {
        match self {
            UsageError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    message: "Unauthorized",
                }),
            )
                .into_response(),
            other => {
                error!("Usage update failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        message: "Failed to update usage",
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for UsageAck {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Authenticate, parse and record a usage update.
///
/// Authentication is checked before the body is looked at, so an
/// unauthenticated request is rejected whatever it carries. A body the
/// extractor could not buffer (too large, aborted) is only reported after
/// that, as an internal failure like any other unusable body.
pub async fn update_usage(
    auth: &dyn AuthProvider,
    store: &dyn UsageStore,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<UsageAck, UsageError> {
    let user_id = auth
        .authenticate(headers)
        .await?
        .ok_or(UsageError::Unauthorized)?;

    let body = body?;
    let request: UsageRequest = serde_json::from_slice(&body)?;
    let update = UsageUpdate {
        user_id,
        increment: request.increment.unwrap_or(DEFAULT_INCREMENT),
    };

    store.increment(&update).await.map_err(UsageError::Store)?;

    info!(user_id = %update.user_id, increment = update.increment, "Usage updated");

    Ok(UsageAck {
        message: "Usage updated",
        increment: update.increment,
    })
}

/// Axum handler for `POST /api/usage`.
pub async fn handle_update_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<UsageAck, UsageError> {
    update_usage(state.auth.as_ref(), state.usage_store.as_ref(), &headers, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn ok_body(raw: &'static [u8]) -> Result<Bytes, BytesRejection> {
        Ok(Bytes::from_static(raw))
    }

    struct FixedAuth(Option<&'static str>);

    #[async_trait]
    impl AuthProvider for FixedAuth {
        async fn authenticate(&self, _headers: &HeaderMap) -> Result<Option<UserId>, AuthError> {
            Ok(self.0.map(UserId::new))
        }
    }

    struct BrokenAuth;

    #[async_trait]
    impl AuthProvider for BrokenAuth {
        async fn authenticate(&self, _headers: &HeaderMap) -> Result<Option<UserId>, AuthError> {
            Err(AuthError("session backend unreachable".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        updates: Mutex<Vec<UsageUpdate>>,
    }

    #[async_trait]
    impl UsageStore for RecordingStore {
        async fn increment(&self, update: &UsageUpdate) -> anyhow::Result<()> {
            self.updates.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl UsageStore for FailingStore {
        async fn increment(&self, _update: &UsageUpdate) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    // ==================== Authentication Tests ====================

    #[tokio::test]
    async fn test_unauthenticated_is_rejected_before_body() {
        let result = update_usage(&FixedAuth(None), &PendingUsageStore, &HeaderMap::new(), ok_body(b"{garbage")).await;
        assert!(matches!(result, Err(UsageError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_auth_failure_is_internal() {
        let result = update_usage(&BrokenAuth, &PendingUsageStore, &HeaderMap::new(), ok_body(b"{}")).await;
        assert!(matches!(result, Err(UsageError::Auth(_))));
    }

    #[tokio::test]
    async fn test_headers_are_passed_to_provider() {
        let auth = crate::auth::StaticTokenAuth::new(vec![("t".to_string(), UserId::new("u1"))]);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        let store = RecordingStore::default();
        update_usage(&auth, &store, &headers, ok_body(b"{}")).await.unwrap();
        assert_eq!(store.updates.lock().unwrap()[0].user_id, UserId::new("u1"));
    }

    // ==================== Body Tests ====================

    #[tokio::test]
    async fn test_missing_increment_defaults_to_one() {
        let store = RecordingStore::default();
        let ack = update_usage(&FixedAuth(Some("alice")), &store, &HeaderMap::new(), ok_body(b"{}"))
            .await
            .unwrap();

        assert_eq!(ack, UsageAck { message: "Usage updated", increment: 1 });
        assert_eq!(
            store.updates.lock().unwrap().as_slice(),
            &[UsageUpdate { user_id: UserId::new("alice"), increment: 1 }]
        );
    }

    #[tokio::test]
    async fn test_null_increment_defaults_to_one() {
        let ack = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(br#"{"increment": null}"#))
            .await
            .unwrap();
        assert_eq!(ack.increment, 1);
    }

    #[tokio::test]
    async fn test_explicit_increment_is_used() {
        let ack = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(br#"{"increment": 5}"#))
            .await
            .unwrap();
        assert_eq!(ack.increment, 5);
    }

    #[tokio::test]
    async fn test_negative_increment_is_accepted() {
        let ack = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(br#"{"increment": -3}"#))
            .await
            .unwrap();
        assert_eq!(ack.increment, -3);
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let ack = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(br#"{"increment": 2, "feature": "export"}"#))
            .await
            .unwrap();
        assert_eq!(ack.increment, 2);
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_body() {
        let result = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(b"{not json")).await;
        assert!(matches!(result, Err(UsageError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_empty_body_is_invalid_body() {
        let result = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(b"")).await;
        assert!(matches!(result, Err(UsageError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_non_integer_increment_is_invalid_body() {
        let bodies: [&'static [u8]; 3] = [br#"{"increment": "5"}"#, br#"{"increment": 1.5}"#, br#""five""#];
        for body in bodies {
            let result = update_usage(&FixedAuth(Some("alice")), &PendingUsageStore, &HeaderMap::new(), ok_body(body)).await;
            assert!(matches!(result, Err(UsageError::InvalidBody(_))));
        }
    }

    // ==================== Store Tests ====================

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let result = update_usage(&FixedAuth(Some("alice")), &FailingStore, &HeaderMap::new(), ok_body(b"{}")).await;
        let err = result.unwrap_err();
        assert!(matches!(err, UsageError::Store(_)));
        assert!(err.to_string().contains("disk full"));
    }

    // ==================== Response Mapping Tests ====================

    #[tokio::test]
    #[traced_test]
    async fn test_internal_failure_is_logged() {
        let err = update_usage(&FixedAuth(Some("alice")), &FailingStore, &HeaderMap::new(), ok_body(b"{}"))
            .await
            .unwrap_err();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs_contain("Usage update failed"));
        assert!(logs_contain("disk full"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unauthorized_is_not_logged_as_error() {
        let response = UsageError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!logs_contain("Usage update failed"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(UsageError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            UsageError::Store(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            UsageError::Auth(AuthError("down".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            UsageAck { message: "Usage updated", increment: 1 }.into_response().status(),
            StatusCode::OK
        );
    }
}
