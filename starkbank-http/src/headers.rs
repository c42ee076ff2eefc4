//! Reading Stark Bank headers from inbound requests.

use http::HeaderMap;

use crate::constants::DIGITAL_SIGNATURE_HEADER;
use crate::error::HttpError;

/// Returns the `Digital-Signature` header value of a webhook request.
///
/// # Errors
///
/// Returns [`HttpError::MissingHeader`] if the header is absent and
/// [`HttpError::InvalidHeader`] if it is not visible ASCII.
pub fn digital_signature(headers: &HeaderMap) -> Result<&str, HttpError> {
    let value = headers
        .get(DIGITAL_SIGNATURE_HEADER)
        .ok_or(HttpError::MissingHeader(DIGITAL_SIGNATURE_HEADER))?;
    value.to_str().map_err(|source| HttpError::InvalidHeader {
        name: DIGITAL_SIGNATURE_HEADER,
        source,
    })
}
