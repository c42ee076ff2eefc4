//! Fakes and helpers for exercising webhook verification without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::FetchError;
use crate::fetcher::{BoxFuture, PublicKeyFetcher};
use crate::key::{PrivateKey, PublicKey};
use crate::user::{User, resolve_user};

/// Deterministic private key derived from a one-byte seed.
///
/// # Panics
///
/// Panics if `seed` is zero.
#[must_use]
pub fn private_key(seed: u8) -> PrivateKey {
    PrivateKey::from_bytes(&[seed; 32]).expect("non-zero seed is a valid scalar")
}

/// Signs `content` and returns the `Digital-Signature` header value.
#[must_use]
pub fn sign_base64(key: &PrivateKey, content: &str) -> String {
    key.sign(content.as_bytes()).to_base64()
}

/// In-memory [`PublicKeyFetcher`] that counts calls.
///
/// Serves a fixed PEM (replaceable with [`rotate`](Self::rotate)) or, when
/// built with [`failing`](Self::failing), answers every call with an
/// authentication error.
#[derive(Debug)]
pub struct FakeFetcher {
    pem: Mutex<Option<String>>,
    calls: AtomicUsize,
    last_access_id: Mutex<Option<String>>,
}

impl FakeFetcher {
    /// Serves `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key cannot be PEM-encoded.
    #[must_use]
    pub fn new(key: &PublicKey) -> Self {
        Self::with_pem(key.to_pem().expect("public key encodes to PEM"))
    }

    /// Serves arbitrary PEM text.
    #[must_use]
    pub fn with_pem(pem: impl Into<String>) -> Self {
        Self {
            pem: Mutex::new(Some(pem.into())),
            calls: AtomicUsize::new(0),
            last_access_id: Mutex::new(None),
        }
    }

    /// Fails every fetch with [`FetchError::Authentication`].
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            pem: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last_access_id: Mutex::new(None),
        }
    }

    /// Serves `key` from now on.
    ///
    /// # Panics
    ///
    /// Panics if the key cannot be PEM-encoded.
    pub fn rotate(&self, key: &PublicKey) {
        let pem = key.to_pem().expect("public key encodes to PEM");
        *self.pem.lock().unwrap_or_else(PoisonError::into_inner) = Some(pem);
    }

    /// Number of fetches performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Access id of the user resolved for the last fetch.
    #[must_use]
    pub fn last_access_id(&self) -> Option<String> {
        self.last_access_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PublicKeyFetcher for FakeFetcher {
    fn fetch_public_key_pem<'a>(
        &'a self,
        user: Option<&'a User>,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self
                .last_access_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner) =
                resolve_user(user).map(|user| user.access_id());
            self.pem
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .ok_or_else(|| FetchError::Authentication {
                    status: 401,
                    body: r#"{"errors":[{"code":"invalidCredentials"}]}"#.to_owned(),
                })
        })
    }
}
