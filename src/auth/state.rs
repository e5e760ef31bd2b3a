//! Signed OAuth `state` parameter binding the post-login callback URL.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use super::{CallbackUrl, JwtSecret};
use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks `state` values: `<nonce>.<hex(callback)>.<hex(mac)>`,
/// where `mac = HMAC-SHA256(secret, "nonce:callback")`.
#[derive(Clone)]
pub struct StateSigner {
    secret: JwtSecret,
}

impl StateSigner {
    pub fn new(secret: JwtSecret) -> Self {
        Self { secret }
    }

    fn mac(&self, nonce: &str, callback: &str) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.key()?)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init: {}", e)))?;
        mac.update(nonce.as_bytes());
        mac.update(b":");
        mac.update(callback.as_bytes());
        Ok(mac)
    }

    pub fn sign(&self, callback: &CallbackUrl) -> AppResult<String> {
        let nonce = Uuid::new_v4().simple().to_string();
        let tag = self.mac(&nonce, callback.as_str())?.finalize().into_bytes();
        Ok(format!(
            "{}.{}.{}",
            nonce,
            hex::encode(callback.as_str()),
            hex::encode(tag)
        ))
    }

    /// Check the signature and return the callback URL it carries.
    pub fn verify(&self, state: &str) -> AppResult<CallbackUrl> {
        let invalid = || AppError::Auth("invalid state".to_string());

        let mut parts = state.splitn(3, '.');
        let (Some(nonce), Some(callback_hex), Some(tag_hex)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let callback = hex::decode(callback_hex)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(invalid)?;
        let tag = hex::decode(tag_hex).map_err(|_| invalid())?;

        self.mac(nonce, &callback)?
            .verify_slice(&tag)
            .map_err(|_| invalid())?;

        Ok(CallbackUrl::sanitize(Some(&callback)))
    }
}
