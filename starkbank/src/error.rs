//! Error types for webhook authentication and parsing.
//!
//! The taxonomy keeps authentication failures ([`SignatureError`]) apart from
//! transport failures ([`FetchError`]) so that callers can answer a rejected
//! webhook with a 4xx and an operational failure with a 5xx.

use std::error::Error as StdError;

/// Boxed error used to carry an underlying transport failure unchanged.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Top-level error returned by [`WebhookParser`](crate::parser::WebhookParser).
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The signature is malformed or does not match the content under any
    /// available public key.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The content could not be unmarshalled into the requested resource.
    #[error("invalid content: {0}")]
    Content(#[from] ContentError),

    /// The public key could not be retrieved from the remote service.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The remote service returned a public key that could not be decoded.
    #[error("invalid public key received: {0}")]
    PublicKey(#[source] KeyError),
}

impl WebhookError {
    /// Returns `true` when the webhook must be rejected as unauthenticated.
    #[must_use]
    pub const fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature(_))
    }

    /// Returns `true` for operational failures the sender may retry later.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::PublicKey(_))
    }

    /// HTTP status code a webhook endpoint should answer with for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSignature(_) => 401,
            Self::Content(_) => 400,
            Self::Fetch(_) | Self::PublicKey(_) => 503,
        }
    }
}

/// Reasons a signature fails to authenticate a payload.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The signature text is not valid base64.
    #[error("signature is not valid base64: {0}")]
    Base64(#[source] base64::DecodeError),

    /// The decoded bytes are not a DER-encoded ECDSA signature.
    #[error("signature is not a DER-encoded ECDSA signature")]
    Encoding(#[source] k256::ecdsa::Error),

    /// Neither the cached nor the refreshed public key validates the content.
    #[error("provided signature and content do not match")]
    Mismatch,
}

/// Failures while retrieving the public key from the remote service.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or its response could not be read.
    #[error("network error: {context}: {source}")]
    Network {
        /// Human-readable context (e.g. `"GET /v2/public-key"`).
        context: &'static str,
        /// The underlying transport error.
        #[source]
        source: BoxError,
    },

    /// The service rejected the credentials used for the request.
    #[error("authentication failed with status {status}: {body}")]
    Authentication {
        /// The HTTP status code (401 or 403).
        status: u16,
        /// The response body.
        body: String,
    },

    /// The service answered with an unexpected status code.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body.
        body: String,
    },

    /// The response was received but carries no usable public key.
    #[error("invalid public key response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Wraps a transport error with its request context.
    pub fn network(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Network {
            context,
            source: source.into(),
        }
    }
}

/// Failures while unmarshalling webhook content into a resource.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The body is not valid JSON for the requested resource.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope key wrapping the resource is absent.
    #[error("missing `{0}` envelope")]
    MissingEnvelope(&'static str),
}

/// Failures while decoding PEM key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// The PEM text is not an SPKI-encoded secp256k1 public key.
    #[error("malformed public key PEM: {0}")]
    PublicKey(String),

    /// The PEM text is neither a SEC1 nor a PKCS#8 secp256k1 private key.
    #[error("malformed private key PEM")]
    PrivateKey,

    /// Raw private key bytes are not a valid secp256k1 scalar.
    #[error("invalid private key bytes")]
    Scalar(#[source] k256::ecdsa::Error),
}
