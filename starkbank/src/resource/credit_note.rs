use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use super::{Resource, ResourceKind};

/// A credit note (CCB) issued to a borrower.
///
/// Nested invoices, payment and signers are kept as raw JSON.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreditNote {
    /// Unique id assigned by the service.
    pub id: String,
    /// Template the note was issued from.
    pub template_id: Option<String>,
    /// Borrower's name.
    pub name: Option<String>,
    /// Borrower's CPF or CNPJ.
    pub tax_id: Option<String>,
    /// Principal, in cents.
    pub nominal_amount: Option<i64>,
    /// Rebate, in cents.
    pub rebate_amount: Option<i64>,
    /// Taxes, in cents.
    pub tax_amount: Option<i64>,
    /// Amount in cents.
    pub amount: Option<i64>,
    /// Yearly nominal interest rate, in percent.
    pub nominal_interest: Option<f64>,
    /// Yearly effective interest rate, in percent.
    pub interest: Option<f64>,
    /// Scheduled disbursement date.
    pub scheduled: Option<String>,
    /// Seconds until the signing window closes.
    pub expiration: Option<i64>,
    /// Disbursement method.
    pub payment_type: Option<String>,
    /// Disbursement target.
    pub payment: Option<Value>,
    /// Repayment installments.
    pub invoices: Vec<Value>,
    /// Parties required to sign.
    pub signers: Vec<Value>,
    /// Caller-supplied id used for idempotency.
    pub external_id: Option<String>,
    /// Address line 1.
    pub street_line_1: Option<String>,
    /// Address line 2.
    pub street_line_2: Option<String>,
    /// District.
    pub district: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State code.
    pub state_code: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Signed document id.
    pub document_id: Option<String>,
    /// Current status.
    pub status: Option<String>,
    /// Ledger transactions created by the note.
    pub transaction_ids: Vec<String>,
    /// Workspace that owns the resource.
    pub workspace_id: Option<String>,
    /// Caller-supplied tags.
    pub tags: Vec<String>,
    /// Creation timestamp, ISO 8601.
    pub created: Option<String>,
    /// Last update timestamp, ISO 8601.
    pub updated: Option<String>,
}

impl Resource for CreditNote {
    const KIND: ResourceKind = ResourceKind::CreditNote;

    fn id(&self) -> &str {
        &self.id
    }
}
