//! Webhook authentication and parsing.
//!
//! [`WebhookParser`] turns a raw webhook body and its `Digital-Signature`
//! header into a typed resource, or rejects it. Verification is tried with the
//! cached public key first; on mismatch the key is fetched again
//! unconditionally and verification is retried once, so a key rotated on the
//! service side does not cause a false rejection. A call performs at most two
//! fetches and two verification attempts.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::cache::{KeyCache, MemoryKeyCache};
use crate::error::{SignatureError, WebhookError};
use crate::fetcher::PublicKeyFetcher;
use crate::key::PublicKey;
use crate::resource::{ParsedResource, Resource, ResourceKind, construct};
use crate::signature::Signature;
use crate::user::User;

/// Verifies webhook signatures and constructs the delivered resources.
///
/// Cheap to share: wrap it in an `Arc` and use it from every request handler.
/// All handlers then share the single key cache slot.
#[derive(Clone)]
pub struct WebhookParser {
    fetcher: Arc<dyn PublicKeyFetcher>,
    cache: Arc<dyn KeyCache>,
}

impl fmt::Debug for WebhookParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookParser")
            .field("cached_key", &self.cache.get().is_some())
            .finish_non_exhaustive()
    }
}

impl WebhookParser {
    /// Creates a parser with an empty in-memory key cache.
    pub fn new(fetcher: impl PublicKeyFetcher + 'static) -> Self {
        Self::with_cache(fetcher, MemoryKeyCache::new())
    }

    /// Creates a parser using the given key cache.
    pub fn with_cache(
        fetcher: impl PublicKeyFetcher + 'static,
        cache: impl KeyCache + 'static,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            cache: Arc::new(cache),
        }
    }

    /// The key cache backing this parser.
    #[must_use]
    pub fn cache(&self) -> &dyn KeyCache {
        self.cache.as_ref()
    }

    /// Authenticates `content` with `signature` and unmarshals it into `T`.
    ///
    /// `content` must be the exact request body: the signature covers its
    /// bytes, not a re-serialized form. `user` authenticates key fetches and
    /// falls back to the process-wide default when `None`.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::InvalidSignature`] if the signature is malformed or
    ///   matches neither the cached nor a freshly fetched key
    /// - [`WebhookError::Content`] if the body cannot be unmarshalled
    /// - [`WebhookError::Fetch`] or [`WebhookError::PublicKey`] if the key
    ///   cannot be retrieved
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "starkbank.webhook.parse", skip_all, fields(resource = %T::KIND), err)
    )]
    pub async fn parse_and_verify<T: Resource>(
        &self,
        content: &str,
        signature: &str,
        user: Option<&User>,
    ) -> Result<T, WebhookError> {
        let signature = Signature::from_base64(signature)?;
        let resource = construct::<T>(content)?;
        self.verify(content.as_bytes(), &signature, user).await?;
        Ok(resource)
    }

    /// Like [`parse_and_verify`](Self::parse_and_verify), for a kind only
    /// known at runtime.
    ///
    /// # Errors
    ///
    /// Same as [`parse_and_verify`](Self::parse_and_verify).
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "starkbank.webhook.parse", skip_all, fields(resource = %kind), err)
    )]
    pub async fn parse_and_verify_kind(
        &self,
        kind: ResourceKind,
        content: &str,
        signature: &str,
        user: Option<&User>,
    ) -> Result<ParsedResource, WebhookError> {
        let signature = Signature::from_base64(signature)?;
        let resource = kind.construct(content)?;
        self.verify(content.as_bytes(), &signature, user).await?;
        Ok(resource)
    }

    /// Checks `signature` over `content`, refreshing the cached key once on
    /// mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Mismatch`] (as [`WebhookError::InvalidSignature`])
    /// when neither key validates, and propagates fetch failures unchanged.
    pub async fn verify(
        &self,
        content: &[u8],
        signature: &Signature,
        user: Option<&User>,
    ) -> Result<(), WebhookError> {
        let key = match self.cache.get() {
            Some(key) => key,
            None => {
                #[cfg(feature = "telemetry")]
                tracing::info!("starkbank.webhook.public_key_cache_miss");
                self.refresh(user).await?
            }
        };
        if signature.verify(content, &key) {
            return Ok(());
        }

        #[cfg(feature = "telemetry")]
        tracing::info!("starkbank.webhook.public_key_refresh");
        let key = self.refresh(user).await?;
        if signature.verify(content, &key) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch.into())
        }
    }

    async fn refresh(&self, user: Option<&User>) -> Result<PublicKey, WebhookError> {
        let pem = match self.fetcher.fetch_public_key_pem(user).await {
            Ok(pem) => pem,
            Err(err) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(error = %err, "failed to fetch webhook public key");
                return Err(err.into());
            }
        };
        let key = PublicKey::from_pem(&pem).map_err(WebhookError::PublicKey)?;
        self.cache.set(key.clone());
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::resource::{Event, PixRequest};
    use crate::testutil::{FakeFetcher, private_key, sign_base64};
    use crate::user::Environment;

    const CONTENT: &str = r#"{"id":"5656565656565656","status":"paid"}"#;

    fn parser(fetcher: &Arc<FakeFetcher>, cache: MemoryKeyCache) -> WebhookParser {
        WebhookParser::with_cache(Arc::clone(fetcher), cache)
    }

    #[tokio::test]
    async fn test_warm_cache_needs_no_fetch() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::with_key(key.public_key()));

        let request: PixRequest = parser
            .parse_and_verify(CONTENT, &sign_base64(&key, CONTENT), None)
            .await
            .unwrap();

        assert_eq!(request.id, "5656565656565656");
        assert_eq!(request.status.as_deref(), Some("paid"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_cold_cache_fetches_once() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::new());

        parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&key, CONTENT), None)
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(parser.cache().get(), Some(key.public_key()));
    }

    #[tokio::test]
    async fn test_rotated_key_recovered_by_single_refresh() {
        let stale = private_key(1);
        let current = private_key(2);
        let fetcher = Arc::new(FakeFetcher::new(&current.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::with_key(stale.public_key()));

        parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&current, CONTENT), None)
            .await
            .unwrap();
        assert_eq!(fetcher.calls(), 1);

        // cache is now warm with the rotated key
        let other = r#"{"id":"42","status":"created"}"#;
        parser
            .parse_and_verify::<PixRequest>(other, &sign_base64(&current, other), None)
            .await
            .unwrap();
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_unverifiable_signature_with_warm_cache() {
        let fetcher = Arc::new(FakeFetcher::new(&private_key(1).public_key()));
        let parser = parser(
            &fetcher,
            MemoryKeyCache::with_key(private_key(1).public_key()),
        );

        let err = parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&private_key(3), CONTENT), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebhookError::InvalidSignature(SignatureError::Mismatch)
        ));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_unverifiable_signature_with_cold_cache() {
        let fetcher = Arc::new(FakeFetcher::new(&private_key(1).public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::new());

        let err = parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&private_key(3), CONTENT), None)
            .await
            .unwrap_err();

        assert!(err.is_invalid_signature());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_tampered_content_is_rejected() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::with_key(key.public_key()));

        let tampered = r#"{"id":"5656565656565656","status":"created"}"#;
        let err = parser
            .parse_and_verify::<PixRequest>(tampered, &sign_base64(&key, CONTENT), None)
            .await
            .unwrap_err();

        assert!(err.is_invalid_signature());
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_malformed_signature_never_fetches() {
        let fetcher = Arc::new(FakeFetcher::new(&private_key(1).public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::new());

        for signature in ["not base64!", "", "bm90IGRlcg=="] {
            let err = parser
                .parse_and_verify::<PixRequest>(CONTENT, signature, None)
                .await
                .unwrap_err();
            assert!(err.is_invalid_signature(), "{signature:?}: {err}");
        }
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_content_rejected_before_fetch() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::new());

        let content = "{\"id\": ";
        let err = parser
            .parse_and_verify::<PixRequest>(content, &sign_base64(&key, content), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Content(_)));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_unchanged() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::failing());
        let parser = parser(&fetcher, MemoryKeyCache::new());

        let err = parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&key, CONTENT), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebhookError::Fetch(FetchError::Authentication { status: 401, .. })
        ));
        assert!(err.is_transport());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_fetched_key() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::with_pem("-----BEGIN PUBLIC KEY-----\nnope\n"));
        let parser = parser(&fetcher, MemoryKeyCache::new());

        let err = parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&key, CONTENT), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::PublicKey(_)));
        assert_eq!(err.status_code(), 503);
        assert!(parser.cache().get().is_none());
    }

    #[tokio::test]
    async fn test_event_envelope_by_kind() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::with_key(key.public_key()));

        let content = r#"{"event":{"id":"123","log":null}}"#;
        let parsed = parser
            .parse_and_verify_kind(ResourceKind::Event, content, &sign_base64(&key, content), None)
            .await
            .unwrap();

        assert_eq!(parsed.kind(), ResourceKind::Event);
        assert_eq!(parsed.id(), "123");

        let event: Event = parser
            .parse_and_verify(content, &sign_base64(&key, content), None)
            .await
            .unwrap();
        assert!(event.log.is_none());
    }

    #[tokio::test]
    async fn test_user_is_passed_to_fetcher() {
        let key = private_key(1);
        let fetcher = Arc::new(FakeFetcher::new(&key.public_key()));
        let parser = parser(&fetcher, MemoryKeyCache::new());
        let user = User::project(Environment::Sandbox, "9999", private_key(5));

        parser
            .parse_and_verify::<PixRequest>(CONTENT, &sign_base64(&key, CONTENT), Some(&user))
            .await
            .unwrap();

        assert_eq!(fetcher.last_access_id().as_deref(), Some("project/9999"));
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_are_bounded() {
        let stale = private_key(1);
        let current = private_key(2);
        let fetcher = Arc::new(FakeFetcher::new(&current.public_key()));
        let parser = Arc::new(parser(&fetcher, MemoryKeyCache::with_key(stale.public_key())));
        let signature = sign_base64(&current, CONTENT);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let parser = Arc::clone(&parser);
                let signature = signature.clone();
                tokio::spawn(async move {
                    parser
                        .parse_and_verify::<PixRequest>(CONTENT, &signature, None)
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!((1..=8).contains(&fetcher.calls()));
        assert_eq!(parser.cache().get(), Some(current.public_key()));
    }
}
