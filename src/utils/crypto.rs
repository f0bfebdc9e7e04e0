//! Cifrado de tokens de método de pago
//!
//! Los tokens del procesador de pagos nunca se persisten en texto plano.
//! Se cifran con AES-256-GCM y se guardan como `base64(nonce || ciphertext)`.
//! La clave (32 bytes, hex) viene de la configuración del entorno.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::utils::errors::AppError;

/// Tamaño del nonce de AES-GCM (96 bits)
const NONCE_LEN: usize = 12;

/// Cifrador de tokens de pago
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Crear el cifrador desde la clave hex de 32 bytes de la configuración
    pub fn from_hex_key(hex_key: &str) -> Result<Self, AppError> {
        let key = decode_hex(hex_key)
            .ok_or_else(|| AppError::Internal("PAYMENT_TOKEN_KEY must be hex".to_string()))?;
        if key.len() != 32 {
            return Err(AppError::Internal(
                "PAYMENT_TOKEN_KEY must be 32 bytes (64 hex chars)".to_string(),
            ));
        }
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| AppError::Internal(format!("Invalid AES key: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Cifrar un token; cada llamada genera un nonce fresco
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Internal(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(combined))
    }

    /// Descifrar un token previamente cifrado con `encrypt`
    pub fn decrypt(&self, encoded: &str) -> Result<String, AppError> {
        let combined = BASE64
            .decode(encoded)
            .map_err(|e| AppError::Internal(format!("Invalid ciphertext encoding: {}", e)))?;
        if combined.len() < NONCE_LEN {
            return Err(AppError::Internal("Ciphertext too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::clone_from_slice(nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(&nonce, ciphertext)
            .map_err(|e| AppError::Internal(format!("Decryption failed: {}", e)))?;
        String::from_utf8(plaintext)
            .map_err(|e| AppError::Internal(format!("Decrypted token is not UTF-8: {}", e)))
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    // El slicing por pares solo es seguro sobre ASCII
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).unwrap();
        let encrypted = cipher.encrypt("pm_tok_visa_4242").unwrap();
        assert_ne!(encrypted, "pm_tok_visa_4242");
        let decrypted = cipher.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, "pm_tok_visa_4242");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).unwrap();
        let a = cipher.encrypt("pm_tok_visa_4242").unwrap();
        let b = cipher.encrypt("pm_tok_visa_4242").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(TokenCipher::from_hex_key("deadbeef").is_err());
    }

    #[test]
    fn test_rejects_non_hex_key() {
        assert!(TokenCipher::from_hex_key("zz0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1eff").is_err());
    }

    #[test]
    fn test_rejects_multibyte_key_without_panicking() {
        // "ñ" ocupa dos bytes en UTF-8; la clave debe rechazarse, no romper
        let key = "ñ".repeat(32);
        assert!(TokenCipher::from_hex_key(&key).is_err());
    }

    #[test]
    fn test_rejects_tampered_ciphertext() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).unwrap();
        let encrypted = cipher.encrypt("pm_tok_visa_4242").unwrap();
        let mut bytes = BASE64.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let tampered = BASE64.encode(bytes);
        assert!(cipher.decrypt(&tampered).is_err());
    }
}
