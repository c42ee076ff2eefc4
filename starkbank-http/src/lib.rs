//! HTTP transport for the Stark Bank SDK.
//!
//! Provides header names, request signing and a [`PublicKeyClient`] that
//! implements [`starkbank::PublicKeyFetcher`] against the service's
//! `/v2/public-key` endpoint.
//!
//! # Modules
//!
//! - [`constants`] - Header names, paths and defaults
//! - [`headers`] - Extraction of the `Digital-Signature` header
//! - [`auth`] - `Access-*` request signing
//! - [`public_key`] - Public key retrieval over HTTP
//! - [`error`] - HTTP transport error types
//!
//! # Example
//!
//! ```no_run
//! use starkbank::{Environment, PrivateKey, User, WebhookParser, resource::PixRequest};
//! use starkbank_http::PublicKeyClient;
//!
//! # async fn handle(body: &str, signature: &str, pem: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let user = User::project(Environment::Sandbox, "5656565656565656", PrivateKey::from_pem(pem)?);
//! let parser = WebhookParser::new(PublicKeyClient::new());
//! let request: PixRequest = parser.parse_and_verify(body, signature, Some(&user)).await?;
//! # let _ = request;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod constants;
pub mod error;
pub mod headers;
pub mod public_key;

pub use error::HttpError;
pub use public_key::{PublicKeyClient, PublicKeyClientError};
