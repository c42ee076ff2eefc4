//! Source of the service's current webhook public key.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::FetchError;
use crate::user::User;

/// A boxed, `Send` future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Retrieves the PEM text of the public key the service signs webhooks with.
///
/// The production implementation performs a network request (see the
/// `starkbank-http` crate). Tests inject fakes.
pub trait PublicKeyFetcher: Send + Sync {
    /// Fetches the current public key as SPKI PEM text.
    ///
    /// `user` authenticates the request. When `None`, implementations fall
    /// back to the process-wide default user, then to anonymous access.
    fn fetch_public_key_pem<'a>(
        &'a self,
        user: Option<&'a User>,
    ) -> BoxFuture<'a, Result<String, FetchError>>;
}

impl<T: PublicKeyFetcher + ?Sized> PublicKeyFetcher for Arc<T> {
    fn fetch_public_key_pem<'a>(
        &'a self,
        user: Option<&'a User>,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        (**self).fetch_public_key_pem(user)
    }
}
