use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use super::{
    CreditNote, IssuingPurchase, IssuingToken, PixRequest, PixReversal, Resource, ResourceKind,
};

/// A webhook event: a notification that a log entry was written for one of
/// the workspace's resources.
///
/// The log is kept as raw JSON; [`Event::typed_log`] decodes it according to
/// the subscription.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    /// Event id.
    pub id: String,
    /// The log entry that triggered the event, as raw JSON.
    pub log: Option<Value>,
    /// Creation timestamp, ISO 8601.
    pub created: Option<String>,
    /// Whether the service considers the event delivered.
    pub is_delivered: Option<bool>,
    /// Subscription that produced the event (e.g. `pix-request.in`).
    pub subscription: Option<String>,
    /// Workspace the event belongs to.
    pub workspace_id: Option<String>,
}

impl Resource for Event {
    const KIND: ResourceKind = ResourceKind::Event;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Event {
    /// Decodes the log according to the subscription that produced the event.
    ///
    /// Returns `Ok(None)` when the event carries no log. Subscriptions with no
    /// typed counterpart yield [`EventLog::Other`].
    ///
    /// # Errors
    ///
    /// Returns the decode error if the log does not match the shape implied by
    /// the subscription.
    pub fn typed_log(&self) -> Result<Option<EventLog>, serde_json::Error> {
        let Some(log) = self.log.clone() else {
            return Ok(None);
        };
        let typed = match self.subscription.as_deref() {
            Some("pix-request.in" | "pix-request.out") => {
                EventLog::PixRequest(serde_json::from_value(log)?)
            }
            Some("pix-reversal.in" | "pix-reversal.out") => {
                EventLog::PixReversal(serde_json::from_value(log)?)
            }
            Some("issuing-purchase") => EventLog::IssuingPurchase(serde_json::from_value(log)?),
            Some("issuing-token") => EventLog::IssuingToken(serde_json::from_value(log)?),
            Some("credit-note") => EventLog::CreditNote(serde_json::from_value(log)?),
            _ => EventLog::Other(log),
        };
        Ok(Some(typed))
    }
}

/// A log entry: one state transition of a resource.
///
/// The resource sits under a key named after it (`request`, `reversal`,
/// `purchase`, `token` or `note`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLog<T> {
    /// Log id.
    pub id: String,
    /// Transition type (e.g. `created`, `credited`, `approved`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Errors attached to the transition.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Creation timestamp, ISO 8601.
    #[serde(default)]
    pub created: Option<String>,
    /// The resource as of this transition.
    #[serde(
        alias = "request",
        alias = "reversal",
        alias = "purchase",
        alias = "token",
        alias = "note"
    )]
    pub resource: T,
}

/// An event log decoded by subscription.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum EventLog {
    /// `pix-request.in` and `pix-request.out`.
    PixRequest(ResourceLog<PixRequest>),
    /// `pix-reversal.in` and `pix-reversal.out`.
    PixReversal(ResourceLog<PixReversal>),
    /// `issuing-purchase`.
    IssuingPurchase(ResourceLog<IssuingPurchase>),
    /// `issuing-token`.
    IssuingToken(ResourceLog<IssuingToken>),
    /// `credit-note`.
    CreditNote(ResourceLog<CreditNote>),
    /// Subscription without a typed log.
    Other(Value),
}
