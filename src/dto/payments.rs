use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGatewayOrderRequest {
    /// Amount in minor units (paise).
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateGatewayOrderResponse {
    pub gateway_order_id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Local order display code.
    pub order: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the gateway's client-side checkout widget needs.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPayload {
    pub key: String,
    pub gateway_order_id: String,
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub prefill: CheckoutPrefill,
    pub order_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub order_code: String,
    pub payment_status: String,
    pub order_status: String,
}

/// Gateway webhook body; only `event` and the payment entity are read.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}
