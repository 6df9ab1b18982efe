//! Razorpay integration via REST API (no SDK dependency).

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::RazorpayConfig,
    error::{AppError, AppResult},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
    base_url: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Key id is public; the checkout widget needs it client-side.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Mint a gateway-side order. `amount` is in minor units (paise).
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder> {
        let resp = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": amount,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("create order request: {e}")))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("create order response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Gateway(format!(
                "create order rejected ({status}): {body}"
            )));
        }

        let id = body["id"]
            .as_str()
            .ok_or_else(|| AppError::Gateway(format!("create order malformed: {body}")))?
            .to_string();
        let amount = body["amount"].as_i64().unwrap_or(amount);
        let currency = body["currency"].as_str().unwrap_or(currency).to_string();

        Ok(GatewayOrder {
            id,
            amount,
            currency,
        })
    }

    /// Checkout-callback signature: HMAC-SHA256 of `"{order_id}|{payment_id}"`
    /// with the key secret, hex encoded. `Mac::verify_slice` compares in
    /// constant time.
    pub fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> AppResult<()> {
        verify_hex_hmac(
            self.key_secret.as_bytes(),
            format!("{gateway_order_id}|{gateway_payment_id}").as_bytes(),
            signature,
        )
        .map_err(|_| AppError::validation("Payment signature verification failed"))
    }

    /// Webhook signature: HMAC-SHA256 of the raw request body with the
    /// webhook secret, hex encoded (`X-Razorpay-Signature`).
    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> AppResult<()> {
        verify_hex_hmac(self.webhook_secret.as_bytes(), body, signature)
            .map_err(|_| AppError::unauthenticated("Webhook signature verification failed"))
    }
}

fn verify_hex_hmac(secret: &[u8], payload: &[u8], signature_hex: &str) -> Result<(), ()> {
    let expected = hex::decode(signature_hex.trim()).map_err(|_| ())?;
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| ())?;
    mac.update(payload);
    mac.verify_slice(&expected).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RazorpayConfig;

    fn client() -> RazorpayClient {
        RazorpayClient::new(&RazorpayConfig {
            key_id: "rzp_test_key".into(),
            key_secret: "order-secret".into(),
            webhook_secret: "webhook-secret".into(),
            base_url: "https://api.razorpay.com".into(),
        })
    }

    fn sign(secret: &[u8], payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn payment_signature_accepts_valid() {
        let sig = sign(b"order-secret", b"order_123|pay_456");
        assert!(client()
            .verify_payment_signature("order_123", "pay_456", &sig)
            .is_ok());
    }

    #[test]
    fn payment_signature_rejects_mismatch() {
        let sig = sign(b"order-secret", b"order_123|pay_456");
        let c = client();
        assert!(c.verify_payment_signature("order_123", "pay_999", &sig).is_err());
        assert!(c.verify_payment_signature("order_123", "pay_456", "deadbeef").is_err());
        assert!(c.verify_payment_signature("order_123", "pay_456", "not hex").is_err());
    }

    #[test]
    fn webhook_signature_uses_webhook_secret() {
        let body = br#"{"event":"payment.captured"}"#;
        let good = sign(b"webhook-secret", body);
        let wrong_key = sign(b"order-secret", body);
        let c = client();
        assert!(c.verify_webhook_signature(body, &good).is_ok());
        assert!(c.verify_webhook_signature(body, &wrong_key).is_err());
    }
}
