//! HTTP-specific constants for the Stark Bank API.

use http::HeaderName;

/// Header carrying the webhook signature (service → receiver).
pub const DIGITAL_SIGNATURE_HEADER: &str = "Digital-Signature";

/// Header naming the caller (`project/<id>` or `organization/<id>[/workspace/<id>]`).
pub const ACCESS_ID: HeaderName = HeaderName::from_static("access-id");

/// Header carrying the request time in fractional Unix seconds.
pub const ACCESS_TIME: HeaderName = HeaderName::from_static("access-time");

/// Header carrying the request signature.
pub const ACCESS_SIGNATURE: HeaderName = HeaderName::from_static("access-signature");

/// Language requested for service messages unless overridden.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Path of the public key listing, relative to the API base URL.
pub const PUBLIC_KEY_PATH: &str = "v2/public-key";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("Rust-SDK-", env!("CARGO_PKG_VERSION"));
