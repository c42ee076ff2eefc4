use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{Resource, ResourceKind};

/// A reversal of a previously settled Pix request.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PixReversal {
    /// Unique id assigned by the service.
    pub id: String,
    /// Amount in cents.
    pub amount: i64,
    /// Caller-supplied id used for idempotency.
    pub external_id: Option<String>,
    /// Central bank end-to-end id.
    pub end_to_end_id: Option<String>,
    /// Reversal reason.
    pub reason: Option<String>,
    /// Central bank return id.
    pub return_id: Option<String>,
    /// Counterparty bank ISPB code.
    pub bank_code: Option<String>,
    /// Fee charged, in cents.
    pub fee: Option<i64>,
    /// Current status.
    pub status: Option<String>,
    /// `in` for received, `out` for sent.
    pub flow: Option<String>,
    /// Caller-supplied tags.
    pub tags: Vec<String>,
    /// Creation timestamp, ISO 8601.
    pub created: Option<String>,
    /// Last update timestamp, ISO 8601.
    pub updated: Option<String>,
}

impl Resource for PixReversal {
    const KIND: ResourceKind = ResourceKind::PixReversal;

    fn id(&self) -> &str {
        &self.id
    }
}
