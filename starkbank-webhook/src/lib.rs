//! Webhook receiver for the Stark Bank SDK.
//!
//! An Axum service that accepts signed webhook callbacks, verifies them
//! against the service's public key and answers with the parsed resource.
//!
//! # Modules
//!
//! - [`handlers`] - Axum route handlers and router builder
//! - [`error`] - Service error types and their HTTP mapping
//! - [`config`] - Server configuration with environment variable expansion

pub mod config;
pub mod error;
pub mod handlers;

pub use handlers::{WebhookState, webhook_router};
