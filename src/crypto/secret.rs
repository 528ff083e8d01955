use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::aes::KEY_SIZE;
use crate::error::{AppError, Result};

/// A symmetric secret used to seal cookie envelopes.
///
/// The bytes are wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    /// Creates a new `SecretKey` from a byte array.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Generates a random secret from the OS RNG.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Parses a secret from its hexadecimal form (64 characters).
    ///
    /// # Arguments
    ///
    /// * `encoded` - The hex-encoded secret.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SecretKey`.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(encoded.trim())
                .map_err(|e| AppError::Validation(format!("Secret must be valid hexadecimal: {}", e)))?,
        );

        let key: [u8; KEY_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            AppError::Validation(format!(
                "Secret must be exactly {} bytes ({} hex characters)",
                KEY_SIZE,
                KEY_SIZE * 2
            ))
        })?;

        Ok(Self(key))
    }

    /// Returns a reference to the key as a byte array.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_64_hex_characters() {
        let key = SecretKey::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; KEY_SIZE]);
    }

    #[test]
    fn rejects_wrong_length_and_bad_hex() {
        assert!(SecretKey::from_hex("12345678").is_err());
        assert!(SecretKey::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let key = SecretKey::new([7u8; KEY_SIZE]);
        assert_eq!(format!("{:?}", key), "SecretKey(<redacted>)");
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(SecretKey::generate().as_bytes(), SecretKey::generate().as_bytes());
    }
}
