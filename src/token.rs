//! Opaque bearer tokens: JSON claims encrypted with AES-256-GCM.
//!
//! Wire format: base64(nonce_12bytes || ciphertext || tag_16bytes). Decode
//! only proves the token was minted with our key; session validity is a
//! separate equality check against the `session_token` stored on the user row.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Identity data embedded in a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub unique_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    pub issued_at: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    key: [u8; KEY_LEN],
}

impl TokenCodec {
    pub fn from_base64(encoded: &str) -> anyhow::Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        if bytes.len() != KEY_LEN {
            anyhow::bail!("token key wrong length: {} (expected {KEY_LEN})", bytes.len());
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    pub fn encode(&self, claims: &Claims) -> AppResult<String> {
        let plaintext = serde_json::to_vec(claims)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("claims serialize: {e}")))?;

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("invalid token key")))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_slice())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("token encryption failed")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        Ok(base64::engine::general_purpose::STANDARD.encode(&out))
    }

    /// Any base64, decryption or claims-shape failure is an invalid token.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let invalid = || AppError::unauthenticated("Invalid or expired token");

        let data = base64::engine::general_purpose::STANDARD
            .decode(token)
            .map_err(|_| invalid())?;
        if data.len() < NONCE_LEN + 16 {
            return Err(invalid());
        }

        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| invalid())?;
        let nonce = Nonce::from_slice(&data[..NONCE_LEN]);
        let plaintext = cipher.decrypt(nonce, &data[NONCE_LEN..]).map_err(|_| invalid())?;

        serde_json::from_slice(&plaintext).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use chrono::Utc;

    fn codec() -> TokenCodec {
        let key = base64::engine::general_purpose::STANDARD.encode([7u8; 32]);
        TokenCodec::from_base64(&key).unwrap()
    }

    fn claims() -> Claims {
        Claims {
            user_id: Uuid::new_v4(),
            unique_id: "CUS-DEADBEEF".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "9000000001".into(),
            user_type: "customer".into(),
            issued_at: Utc::now().timestamp(),
        }
    }

    #[test]
    fn round_trip() {
        let codec = codec();
        let claims = claims();
        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.user_type, "customer");
    }

    #[test]
    fn tampered_token_rejected() {
        let codec = codec();
        let token = codec.encode(&claims()).unwrap();
        let mut bytes = base64::engine::general_purpose::STANDARD
            .decode(&token)
            .unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = base64::engine::general_purpose::STANDARD.encode(&bytes);
        assert!(codec.decode(&tampered).is_err());
    }

    #[test]
    fn wrong_key_rejected() {
        let token = codec().encode(&claims()).unwrap();
        let other_key = base64::engine::general_purpose::STANDARD.encode([9u8; 32]);
        let other = TokenCodec::from_base64(&other_key).unwrap();
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(codec().decode("not-a-token").is_err());
        assert!(codec().decode("").is_err());
    }
}
