//! Wire types for the payment verification endpoint.

use serde::Deserialize;

/// Payment attributes reported by the verification endpoint.
///
/// Read-only; sourced entirely from the payment provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    pub reference: String,
    pub tx_ref: String,
    pub amount: f64,
    pub currency: String,
    pub charge: f64,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub method: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO-8601 timestamp as sent by the provider.
    pub created_at: String,
}

/// Body of `GET /api/verify`. A missing or `null` `paymentData` means the
/// provider did not confirm the payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(rename = "paymentData", default)]
    pub payment_data: Option<PaymentInfo>,
}
