use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{Resource, ResourceKind};

/// A card purchase, delivered for real-time authorization.
///
/// `amount` is in the card currency's cents; `merchant_amount` in the
/// merchant's.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuingPurchase {
    /// Unique id assigned by the service.
    pub id: String,
    /// Card holder's name.
    pub holder_name: Option<String>,
    /// Card the operation belongs to.
    pub card_id: Option<String>,
    /// Last four digits of the card.
    pub card_ending: Option<String>,
    /// Purchase purpose (e.g. `purchase`, `withdrawal`).
    pub purpose: Option<String>,
    /// Amount in cents.
    pub amount: i64,
    /// IOF charged, in cents.
    pub tax: Option<i64>,
    /// Amount in the issuer currency, in cents.
    pub issuer_amount: Option<i64>,
    /// Issuer currency code.
    pub issuer_currency_code: Option<String>,
    /// Issuer currency symbol.
    pub issuer_currency_symbol: Option<String>,
    /// Amount in the merchant currency, in cents.
    pub merchant_amount: Option<i64>,
    /// Merchant currency code.
    pub merchant_currency_code: Option<String>,
    /// Merchant currency symbol.
    pub merchant_currency_symbol: Option<String>,
    /// Merchant category.
    pub merchant_category_code: Option<String>,
    /// Merchant country.
    pub merchant_country_code: Option<String>,
    /// Merchant id.
    pub merchant_id: Option<String>,
    /// Merchant name.
    pub merchant_name: Option<String>,
    /// Merchant fee, in cents.
    pub merchant_fee: Option<i64>,
    /// Acquirer id.
    pub acquirer_id: Option<String>,
    /// Digital wallet id (e.g. `google`, `apple`).
    pub wallet_id: Option<String>,
    /// Entry method (e.g. `chip`, `token`).
    pub method_code: Option<String>,
    /// Fraud score between 0 and 1.
    pub score: Option<f64>,
    /// Central bank end-to-end id.
    pub end_to_end_id: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Whether a partial approval is acceptable.
    pub is_partial_allowed: Option<bool>,
    /// Current status.
    pub status: Option<String>,
    /// Caller-supplied tags.
    pub tags: Vec<String>,
    /// Tags of the card.
    pub card_tags: Vec<String>,
    /// Tags of the card holder.
    pub holder_tags: Vec<String>,
    /// Creation timestamp, ISO 8601.
    pub created: Option<String>,
    /// Last update timestamp, ISO 8601.
    pub updated: Option<String>,
}

impl Resource for IssuingPurchase {
    const KIND: ResourceKind = ResourceKind::IssuingPurchase;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::construct;

    #[test]
    fn test_decode_authorization_request() {
        let content = r#"{
            "id": "4242",
            "amount": 10000,
            "merchantAmount": 2000,
            "merchantCurrencyCode": "USD",
            "merchantCategoryCode": "fastFoodRestaurants",
            "score": 0.82,
            "isPartialAllowed": false,
            "cardTags": ["travel"]
        }"#;
        let purchase: IssuingPurchase = construct(content).unwrap();
        assert_eq!(purchase.amount, 10000);
        assert_eq!(purchase.merchant_amount, Some(2000));
        assert_eq!(purchase.score, Some(0.82));
        assert_eq!(purchase.is_partial_allowed, Some(false));
        assert_eq!(purchase.card_tags, ["travel"]);
        assert!(purchase.holder_tags.is_empty());
    }
}
