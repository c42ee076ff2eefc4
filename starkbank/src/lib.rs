#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Stark Bank SDK.
//!
//! This crate authenticates inbound webhooks and turns them into typed
//! resources. A webhook body is signed by the service with ECDSA over
//! secp256k1 (SHA-256 digest, DER encoding, base64 text in the
//! `Digital-Signature` header). The verification key is published by the
//! service, fetched on demand and cached in a single slot.
//!
//! # Modules
//!
//! - [`parser`] - Verify-and-construct orchestration ([`WebhookParser`])
//! - [`signature`] - Signature decoding and verification
//! - [`key`] - Public and private key material
//! - [`cache`] - Single-slot public key cache
//! - [`fetcher`] - Seam for retrieving the public key (see `starkbank-http`)
//! - [`resource`] - Resource registry and typed resources
//! - [`user`] - API credentials and the process-wide default user
//! - [`error`] - Error taxonomy
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring
//! - `test-utils` - Exposes fakes for testing code built on this crate

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod key;
pub mod parser;
pub mod resource;
pub mod signature;
pub mod user;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

pub use cache::{KeyCache, MemoryKeyCache};
pub use error::{ContentError, FetchError, KeyError, SignatureError, WebhookError};
pub use fetcher::{BoxFuture, PublicKeyFetcher};
pub use key::{PrivateKey, PublicKey};
pub use parser::WebhookParser;
pub use resource::{ParsedResource, Resource, ResourceKind};
pub use signature::Signature;
pub use user::{Environment, User};
