//! Payment request and response types

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Parameters for a new payment.
///
/// Optional fields left unset (or set to an empty string) fall back to the
/// client configuration defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Amount to charge, passed through verbatim
    pub amount: Decimal,
    /// Currency override
    pub currency: Option<String>,
    /// Status callback URL override
    pub callback_url: Option<String>,
    /// Free-form description shown to the payer
    pub description: Option<String>,
    /// Refund window override (ISO-8601 duration)
    pub refundable_for: Option<String>,
}

impl PaymentRequest {
    /// Create a payment request for the given amount
    pub fn new(amount: impl Into<Decimal>) -> Self {
        Self {
            amount: amount.into(),
            currency: None,
            callback_url: None,
            description: None,
            refundable_for: None,
        }
    }

    /// Override the configured currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Override the configured status callback URL
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Set the payment description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the configured refund window
    pub fn with_refundable_for(mut self, refundable_for: impl Into<String>) -> Self {
        self.refundable_for = Some(refundable_for.into());
        self
    }
}

/// Amount and currency pair as the gateway expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryValue {
    /// Amount, serialized as a JSON number
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    /// Currency code
    pub currency: String,
}

/// Wire body of `POST /payments`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody {
    pub monetary_value: MonetaryValue,
    pub status_callback_url: String,
    pub description: String,
    pub refundable_for: String,
}

/// Gateway answer to a successful payment creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPayment {
    /// Gateway payment identifier
    pub payment_id: String,
    /// Short code the payer can type into the app
    pub readable_code: String,
    /// Deep link into the personal banking app
    pub personal_app_link: String,
    /// Expiry of the payment request
    pub valid_until: String,
    /// Base64 QR code image, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Deep link into the business banking app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_app_link: Option<String>,
    /// Deep link into the corporate banking app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_app_link: Option<String>,
    /// Any other fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gateway answer to a status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    /// Opaque gateway status, e.g. `PAID`
    pub status: String,
    /// Remaining fields (paidAt, amount, decliningReason, ...), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the gateway's asynchronous status callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCallback {
    /// Payment identifier; the gateway sends it as `id`
    #[serde(rename = "paymentId", alias = "id")]
    pub payment_id: String,
    /// New payment status
    pub status: String,
}

impl PaymentCallback {
    /// Create a callback notification
    pub fn new(payment_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            status: status.into(),
        }
    }
}

/// Serialize whole amounts as JSON integers and fractional ones as floats
fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract().is_zero() {
        if let Some(whole) = amount.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&amount.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_create_body_wire_format() {
        let body = CreatePaymentBody {
            monetary_value: MonetaryValue {
                amount: Decimal::from(1000),
                currency: "IQD".to_string(),
            },
            status_callback_url: "http://localhost/callback".to_string(),
            description: "Test payment description".to_string(),
            refundable_for: "P7D".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "monetaryValue": {"amount": 1000, "currency": "IQD"},
                "statusCallbackUrl": "http://localhost/callback",
                "description": "Test payment description",
                "refundableFor": "P7D"
            })
        );
    }

    #[test]
    fn test_fractional_amount_is_a_number() {
        let value = MonetaryValue {
            amount: Decimal::from_str("12.5").unwrap(),
            currency: "USD".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"amount": 12.5, "currency": "USD"})
        );
    }

    #[test]
    fn test_created_payment_keeps_unknown_fields() {
        let payment: CreatedPayment = serde_json::from_value(json!({
            "paymentId": "p1",
            "readableCode": "RC1",
            "personalAppLink": "link",
            "validUntil": "2025-01-01",
            "qrCode": "data:image/png;base64,AAAA",
            "merchantNote": "kept"
        }))
        .unwrap();

        assert_eq!(payment.payment_id, "p1");
        assert_eq!(payment.qr_code.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(payment.business_app_link, None);
        assert_eq!(payment.extra.get("merchantNote"), Some(&json!("kept")));
    }

    #[test]
    fn test_created_payment_requires_payment_id() {
        let result: std::result::Result<CreatedPayment, _> = serde_json::from_value(json!({
            "readableCode": "RC1",
            "personalAppLink": "link",
            "validUntil": "2025-01-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_callback_accepts_gateway_id_field() {
        let callback: PaymentCallback =
            serde_json::from_value(json!({"id": "p1", "status": "PAID"})).unwrap();
        assert_eq!(callback, PaymentCallback::new("p1", "PAID"));

        let callback: PaymentCallback =
            serde_json::from_value(json!({"paymentId": "p2", "status": "DECLINED"})).unwrap();
        assert_eq!(callback.payment_id, "p2");
    }

    #[test]
    fn test_request_builder() {
        let request = PaymentRequest::new(500)
            .with_currency("USD")
            .with_description("Coffee");
        assert_eq!(request.amount, Decimal::from(500));
        assert_eq!(request.currency.as_deref(), Some("USD"));
        assert_eq!(request.callback_url, None);
        assert_eq!(request.description.as_deref(), Some("Coffee"));
    }
}
