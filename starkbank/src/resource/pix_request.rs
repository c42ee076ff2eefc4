use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{Resource, ResourceKind};

/// A Pix transfer, either received (`flow = "in"`) or sent (`flow = "out"`).
///
/// Amounts are integers in cents.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PixRequest {
    /// Unique id assigned by the service.
    pub id: String,
    /// Amount in cents.
    pub amount: i64,
    /// Caller-supplied id used for idempotency.
    pub external_id: Option<String>,
    /// Central bank end-to-end id.
    pub end_to_end_id: Option<String>,
    /// Sender's full name.
    pub sender_name: Option<String>,
    /// Sender's CPF or CNPJ.
    pub sender_tax_id: Option<String>,
    /// Sender's bank ISPB code.
    pub sender_bank_code: Option<String>,
    /// Sender's branch.
    pub sender_branch_code: Option<String>,
    /// Sender's account number.
    pub sender_account_number: Option<String>,
    /// Sender's account type.
    pub sender_account_type: Option<String>,
    /// Receiver's full name.
    pub receiver_name: Option<String>,
    /// Receiver's CPF or CNPJ.
    pub receiver_tax_id: Option<String>,
    /// Receiver's bank ISPB code.
    pub receiver_bank_code: Option<String>,
    /// Receiver's branch.
    pub receiver_branch_code: Option<String>,
    /// Receiver's account number.
    pub receiver_account_number: Option<String>,
    /// Receiver's account type.
    pub receiver_account_type: Option<String>,
    /// Pix key the transfer was addressed to.
    pub receiver_key_id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Reconciliation id (e.g. from a dynamic QR code).
    pub reconciliation_id: Option<String>,
    /// Tax id of the payment initiator.
    pub initiator_tax_id: Option<String>,
    /// Withdrawn amount for Pix Saque/Troco, in cents.
    pub cash_amount: Option<i64>,
    /// ISPB of the cash provider.
    pub cashier_bank_code: Option<String>,
    /// Cash provider type.
    pub cashier_type: Option<String>,
    /// Initiation method (e.g. `manual`, `qrcode`).
    pub method: Option<String>,
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

impl Resource for PixRequest {
    const KIND: ResourceKind = ResourceKind::PixRequest;

    fn id(&self) -> &str {
        &self.id
    }
}
