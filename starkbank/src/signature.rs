//! Digital signatures carried in the `Digital-Signature` header.
//!
//! On the wire a signature is the base64 text of a DER-encoded ECDSA
//! secp256k1 signature over the SHA-256 digest of the exact request body.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use k256::ecdsa;
use k256::ecdsa::signature::Verifier;

use crate::error::SignatureError;
use crate::key::PublicKey;

/// A decoded ECDSA signature, ready for verification.
///
/// Signatures are normalized to low-S form on decode. The service signs
/// without normalization and secp256k1 verification only accepts low-S, so
/// a high-S signature is replaced by its equivalent low-S form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(ecdsa::Signature);

impl Signature {
    /// Decodes the base64 text form of a DER signature.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Base64`] or [`SignatureError::Encoding`].
    pub fn from_base64(text: &str) -> Result<Self, SignatureError> {
        let der = b64.decode(text.trim()).map_err(SignatureError::Base64)?;
        Self::from_der(&der)
    }

    /// Decodes a DER-encoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Encoding`] if the bytes are not a DER
    /// `ECDSA-Sig-Value` with in-range scalars.
    pub fn from_der(der: &[u8]) -> Result<Self, SignatureError> {
        let signature = ecdsa::Signature::from_der(der).map_err(SignatureError::Encoding)?;
        Ok(Self::from(signature))
    }

    /// Returns the DER encoding.
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        self.0.to_der().as_bytes().to_vec()
    }

    /// Returns the base64 text of the DER encoding.
    #[must_use]
    pub fn to_base64(&self) -> String {
        b64.encode(self.0.to_der().as_bytes())
    }

    /// Returns `true` only if this signature was produced by the private
    /// counterpart of `key` over exactly `content`.
    #[must_use]
    pub fn verify(&self, content: &[u8], key: &PublicKey) -> bool {
        key.as_verifying_key().verify(content, &self.0).is_ok()
    }
}

impl From<ecdsa::Signature> for Signature {
    fn from(signature: ecdsa::Signature) -> Self {
        Self(signature.normalize_s().unwrap_or(signature))
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}
