//! Sealed cookie values.
//!
//! A cookie value is `base64url(nonce || ciphertext)`, where the ciphertext is
//! the JSON payload encrypted with AES-256-GCM under the cookie's secret and the
//! cookie name as associated data. Anything that fails to open is rejected.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use serde::{Serialize, de::DeserializeOwned};

use crate::crypto::aes::{self, NONCE_SIZE};
use crate::crypto::secret::SecretKey;
use crate::error::{AppError, Result};

/// Payload carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionCookie {
    pub session_token: String,
}

/// Payload carried by the CSRF cookie.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CsrfCookie {
    pub csrf_token: String,
}

/// Seals and opens payloads for one named cookie.
#[derive(Clone, Debug)]
pub struct CookieCodec {
    name: Arc<str>,
    key: Arc<SecretKey>,
}

impl CookieCodec {
    /// Creates a codec bound to `name` and `key`.
    pub fn new(name: &str, key: SecretKey) -> Self {
        Self {
            name: Arc::from(name),
            key: Arc::new(key),
        }
    }

    /// The cookie name this codec is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializes and seals `payload` into a cookie-safe string.
    pub fn encode<T: Serialize>(&self, payload: &T) -> Result<String> {
        let plaintext = sonic_rs::to_vec(payload)
            .map_err(|e| AppError::Internal(format!("Cookie serialization failed: {}", e)))?;

        let (ciphertext, nonce) = aes::encrypt(self.key.as_bytes(), &plaintext, self.name.as_bytes())?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(general_purpose::URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Opens a value produced by [`CookieCodec::encode`].
    ///
    /// # Arguments
    ///
    /// * `value` - The raw cookie value.
    ///
    /// # Returns
    ///
    /// The payload, or an `AppError::Encryption` if the value was not sealed by
    /// this codec's key for this cookie name, or was modified.
    pub fn decode<T: DeserializeOwned>(&self, value: &str) -> Result<T> {
        let sealed = general_purpose::URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| AppError::Encryption(format!("Invalid cookie encoding: {}", e)))?;

        if sealed.len() <= NONCE_SIZE {
            return Err(AppError::Encryption("Cookie value too short".to_string()));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let nonce: [u8; NONCE_SIZE] = nonce
            .try_into()
            .map_err(|_| AppError::Encryption("Invalid cookie nonce".to_string()))?;

        let plaintext = aes::decrypt(self.key.as_bytes(), ciphertext, &nonce, self.name.as_bytes())?;

        sonic_rs::from_slice(&plaintext)
            .map_err(|e| AppError::Encryption(format!("Invalid cookie payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(name: &str, byte: u8) -> CookieCodec {
        CookieCodec::new(name, SecretKey::new([byte; 32]))
    }

    fn payload() -> SessionCookie {
        SessionCookie {
            session_token: "4f".repeat(32),
        }
    }

    #[test]
    fn decodes_what_it_encodes() {
        let codec = codec("session_token", 1);
        let value = codec.encode(&payload()).unwrap();
        let decoded: SessionCookie = codec.decode(&value).unwrap();
        assert_eq!(decoded, payload());
    }

    #[test]
    fn envelope_does_not_reveal_the_token() {
        let codec = codec("session_token", 1);
        let value = codec.encode(&payload()).unwrap();
        assert!(!value.contains(&payload().session_token));
    }

    #[test]
    fn rejects_a_different_secret() {
        let value = codec("session_token", 1).encode(&payload()).unwrap();
        let result: Result<SessionCookie> = codec("session_token", 2).decode(&value);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_a_value_sealed_for_another_cookie() {
        let value = codec("csrf_token", 1).encode(&payload()).unwrap();
        let result: Result<SessionCookie> = codec("session_token", 1).decode(&value);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_tampered_values() {
        let codec = codec("session_token", 1);
        let value = codec.encode(&payload()).unwrap();

        let mut raw = general_purpose::URL_SAFE_NO_PAD.decode(&value).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = general_purpose::URL_SAFE_NO_PAD.encode(raw);

        assert!(codec.decode::<SessionCookie>(&tampered).is_err());
        assert!(codec.decode::<SessionCookie>("not base64 !!").is_err());
        assert!(codec.decode::<SessionCookie>("").is_err());
    }
}
