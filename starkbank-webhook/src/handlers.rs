//! Axum route handlers for the webhook receiver.
//!
//! `POST /webhooks/{resource}` authenticates the body against the
//! `Digital-Signature` header and answers with the parsed resource.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use starkbank::{ParsedResource, ResourceKind, WebhookParser};
use starkbank_http::headers::digital_signature;

use crate::error::ServiceError;

/// Shared application state: one parser, and so one key cache, for all
/// requests.
pub type WebhookState = Arc<WebhookParser>;

/// `POST /webhooks/{resource}` - Verifies and parses a webhook.
///
/// The body is read as raw bytes; the signature covers them exactly.
///
/// # Errors
///
/// Returns 404 for an unknown resource, 401 for a missing or invalid
/// signature, 400 for malformed content and 503 when the public key cannot
/// be retrieved.
pub async fn post_webhook(
    State(parser): State<WebhookState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ParsedResource>, ServiceError> {
    let kind: ResourceKind = resource.parse()?;
    let signature = digital_signature(&headers)?;
    let content = std::str::from_utf8(&body)?;

    let parsed = parser
        .parse_and_verify_kind(kind, content, signature, None)
        .await?;
    tracing::info!(resource = %kind, id = parsed.id(), "webhook accepted");
    Ok(Json(parsed))
}

/// `GET /health` - Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates an Axum [`axum::Router`] with the webhook and health endpoints.
pub fn webhook_router(state: WebhookState) -> axum::Router {
    axum::Router::new()
        .route("/webhooks/{resource}", post(post_webhook))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use starkbank::MemoryKeyCache;
    use starkbank::testutil::{FakeFetcher, private_key, sign_base64};
    use tower::ServiceExt;

    fn router(fetcher: FakeFetcher, cache: MemoryKeyCache) -> axum::Router {
        webhook_router(Arc::new(WebhookParser::with_cache(fetcher, cache)))
    }

    fn warm_router() -> axum::Router {
        let key = private_key(1).public_key();
        router(FakeFetcher::new(&key), MemoryKeyCache::with_key(key))
    }

    fn webhook(resource: &str, content: &str, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/webhooks/{resource}"))
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("Digital-Signature", signature);
        }
        builder.body(Body::from(content.to_owned())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_signed_pix_request() {
        let content = r#"{"id":"5656565656565656","amount":1000,"status":"paid"}"#;
        let signature = sign_base64(&private_key(1), content);

        let response = warm_router()
            .oneshot(webhook("pix-request", content, Some(&signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resource"], "pix-request");
        assert_eq!(body["data"]["id"], "5656565656565656");
        assert_eq!(body["data"]["amount"], 1000);
    }

    #[tokio::test]
    async fn test_accepts_event_envelope() {
        let content = r#"{"event":{"id":"123","log":null,"subscription":"boleto"}}"#;
        let signature = sign_base64(&private_key(1), content);

        let response = warm_router()
            .oneshot(webhook("event", content, Some(&signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resource"], "event");
        assert_eq!(body["data"]["id"], "123");
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let response = warm_router()
            .oneshot(webhook("boleto", "{}", Some("sig")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_signature_header() {
        let response = warm_router()
            .oneshot(webhook("pix-request", r#"{"id":"1"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("Digital-Signature"));
    }

    #[tokio::test]
    async fn test_forged_signature() {
        let content = r#"{"id":"1","status":"paid"}"#;
        let signature = sign_base64(&private_key(2), content);

        let response = warm_router()
            .oneshot(webhook("pix-request", content, Some(&signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "invalid signature: provided signature and content do not match"
        );
    }

    #[tokio::test]
    async fn test_malformed_content() {
        let content = r#"{"id": 1"#;
        let signature = sign_base64(&private_key(1), content);

        let response = warm_router()
            .oneshot(webhook("credit-note", content, Some(&signature)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unavailable_public_key() {
        let content = r#"{"id":"1"}"#;
        let signature = sign_base64(&private_key(1), content);

        let response = router(FakeFetcher::failing(), MemoryKeyCache::new())
            .oneshot(webhook("issuing-token", content, Some(&signature)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = warm_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}
