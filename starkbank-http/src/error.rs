//! Error types for the HTTP transport layer.

use http::HeaderName;
use http::header::{InvalidHeaderValue, ToStrError};

/// Errors that can occur while reading or building HTTP headers.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// A required header is absent.
    #[error("missing `{0}` header")]
    MissingHeader(&'static str),

    /// A header is present but not visible ASCII.
    #[error("`{name}` header is not valid text: {source}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// The underlying conversion error.
        #[source]
        source: ToStrError,
    },

    /// A header value could not be built from the given text.
    #[error("cannot encode `{name}` header: {source}")]
    InvalidHeaderValue {
        /// Header name.
        name: HeaderName,
        /// The underlying conversion error.
        #[source]
        source: InvalidHeaderValue,
    },
}
