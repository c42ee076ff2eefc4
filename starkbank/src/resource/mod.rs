//! Resource registry for webhook content.
//!
//! Every resource the service can deliver by webhook has a [`ResourceKind`]
//! and a typed struct implementing [`Resource`]. The kind carries the one
//! structural rule that differs between resources: `Event` bodies wrap the
//! payload under an `event` key, every other resource is the body root.
//!
//! - [`construct`] - typed decode when the resource is known at compile time
//! - [`ResourceKind::construct`] - decode into [`ParsedResource`] when the kind
//!   is only known at runtime (e.g. from a URL path segment)

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

mod credit_note;
mod event;
mod issuing_purchase;
mod issuing_token;
mod pix_request;
mod pix_reversal;

pub use credit_note::CreditNote;
pub use event::{Event, EventLog, ResourceLog};
pub use issuing_purchase::IssuingPurchase;
pub use issuing_token::IssuingToken;
pub use pix_request::PixRequest;
pub use pix_reversal::PixReversal;

/// The finite set of resources delivered by webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Webhook event envelope.
    Event,
    /// Pix request (inbound or outbound transfer).
    PixRequest,
    /// Pix reversal.
    PixReversal,
    /// Issuing card purchase authorization.
    IssuingPurchase,
    /// Issuing card token authorization.
    IssuingToken,
    /// Credit note.
    CreditNote,
}

impl ResourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Event,
        Self::PixRequest,
        Self::PixReversal,
        Self::IssuingPurchase,
        Self::IssuingToken,
        Self::CreditNote,
    ];

    /// PascalCase resource name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::PixRequest => "PixRequest",
            Self::PixReversal => "PixReversal",
            Self::IssuingPurchase => "IssuingPurchase",
            Self::IssuingToken => "IssuingToken",
            Self::CreditNote => "CreditNote",
        }
    }

    /// Decamelized name as used in URL paths (e.g. `pix-request`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::PixRequest => "pix-request",
            Self::PixReversal => "pix-reversal",
            Self::IssuingPurchase => "issuing-purchase",
            Self::IssuingToken => "issuing-token",
            Self::CreditNote => "credit-note",
        }
    }

    /// Key under which the body wraps the resource, if any.
    #[must_use]
    pub const fn envelope(self) -> Option<&'static str> {
        match self {
            Self::Event => Some("event"),
            _ => None,
        }
    }

    /// Unmarshals `content` into the resource of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the JSON is malformed or the envelope is
    /// missing.
    pub fn construct(self, content: &str) -> Result<ParsedResource, ContentError> {
        let parsed = match self {
            Self::Event => ParsedResource::Event(construct(content)?),
            Self::PixRequest => ParsedResource::PixRequest(construct(content)?),
            Self::PixReversal => ParsedResource::PixReversal(construct(content)?),
            Self::IssuingPurchase => ParsedResource::IssuingPurchase(construct(content)?),
            Self::IssuingToken => ParsedResource::IssuingToken(construct(content)?),
            Self::CreditNote => ParsedResource::CreditNote(construct(content)?),
        };
        Ok(parsed)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    /// Accepts either the PascalCase name or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.slug() == s)
            .ok_or_else(|| UnknownResourceKind(s.to_owned()))
    }
}

/// Error returned when parsing an unknown resource name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind '{0}'")]
pub struct UnknownResourceKind(pub String);

/// A typed resource that can be delivered by webhook.
pub trait Resource: DeserializeOwned + Serialize + Send {
    /// Registry entry for this resource.
    const KIND: ResourceKind;

    /// Resource id.
    fn id(&self) -> &str;
}

/// Unmarshals `content` into `T`, unwrapping the envelope of `T::KIND`.
///
/// The body is parsed exactly once.
///
/// # Errors
///
/// Returns [`ContentError::Json`] for malformed JSON and
/// [`ContentError::MissingEnvelope`] when the envelope key is absent.
pub fn construct<T: Resource>(content: &str) -> Result<T, ContentError> {
    let Some(key) = T::KIND.envelope() else {
        return Ok(serde_json::from_str(content)?);
    };
    let mut body: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    let inner = body.remove(key).ok_or(ContentError::MissingEnvelope(key))?;
    Ok(T::deserialize(inner)?)
}

/// A resource decoded from webhook content, tagged by kind.
///
/// Serializes as `{"resource": "<slug>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource", content = "data", rename_all = "kebab-case")]
pub enum ParsedResource {
    /// See [`Event`].
    Event(Event),
    /// See [`PixRequest`].
    PixRequest(PixRequest),
    /// See [`PixReversal`].
    PixReversal(PixReversal),
    /// See [`IssuingPurchase`].
    IssuingPurchase(IssuingPurchase),
    /// See [`IssuingToken`].
    IssuingToken(IssuingToken),
    /// See [`CreditNote`].
    CreditNote(CreditNote),
}

impl ParsedResource {
    /// The kind of the wrapped resource.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Event(_) => ResourceKind::Event,
            Self::PixRequest(_) => ResourceKind::PixRequest,
            Self::PixReversal(_) => ResourceKind::PixReversal,
            Self::IssuingPurchase(_) => ResourceKind::IssuingPurchase,
            Self::IssuingToken(_) => ResourceKind::IssuingToken,
            Self::CreditNote(_) => ResourceKind::CreditNote,
        }
    }

    /// Id of the wrapped resource.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Event(r) => r.id(),
            Self::PixRequest(r) => r.id(),
            Self::PixReversal(r) => r.id(),
            Self::IssuingPurchase(r) => r.id(),
            Self::IssuingToken(r) => r.id(),
            Self::CreditNote(r) => r.id(),
        }
    }
}
