use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{Resource, ResourceKind};

/// A card tokenization request from a digital wallet.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuingToken {
    /// Unique id assigned by the service.
    pub id: String,
    /// Card the operation belongs to.
    pub card_id: Option<String>,
    /// Digital wallet id (e.g. `google`, `apple`).
    pub wallet_id: Option<String>,
    /// Digital wallet display name.
    pub wallet_name: Option<String>,
    /// Wallet instance on the device.
    pub wallet_instance_id: Option<String>,
    /// Token id assigned by the wallet.
    pub wallet_token_id: Option<String>,
    /// Merchant id.
    pub merchant_id: Option<String>,
    /// Caller-supplied id used for idempotency.
    pub external_id: Option<String>,
    /// Code used to activate the token.
    pub activation_code: Option<String>,
    /// Entry method (e.g. `chip`, `token`).
    pub method_code: Option<String>,
    /// Device type.
    pub device_type: Option<String>,
    /// Device name.
    pub device_name: Option<String>,
    /// Device operating system.
    pub device_os_name: Option<String>,
    /// Device operating system version.
    pub device_os_version: Option<String>,
    /// Current status.
    pub status: Option<String>,
    /// Caller-supplied tags.
    pub tags: Vec<String>,
    /// Creation timestamp, ISO 8601.
    pub created: Option<String>,
    /// Last update timestamp, ISO 8601.
    pub updated: Option<String>,
}

impl Resource for IssuingToken {
    const KIND: ResourceKind = ResourceKind::IssuingToken;

    fn id(&self) -> &str {
        &self.id
    }
}
