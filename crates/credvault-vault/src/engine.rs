// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential encryption engine.
//!
//! Each `encrypt` call draws a fresh salt and nonce, derives a one-off key
//! from the device fingerprint with PBKDF2, and seals the secret with
//! AES-256-GCM. Key derivation is CPU-bound, so it runs on tokio's blocking
//! pool.

use std::num::NonZeroU32;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use credvault_config::model::{VaultConfig, MIN_PBKDF2_ITERATIONS};
use credvault_core::{CredvaultError, DeviceIdentity};
use ring::aead::NONCE_LEN;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use crate::payload::{EncryptedPayload, CURRENT_VERSION};
use crate::{crypto, kdf};

/// Result of a successful decryption.
pub struct Decrypted {
    pub plaintext: SecretString,
    /// Whether the value came from the legacy scheme. Always false from
    /// [`CryptoEngine::decrypt`].
    pub was_legacy: bool,
}

impl std::fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypted")
            .field("plaintext", &"[REDACTED]")
            .field("was_legacy", &self.was_legacy)
            .finish()
    }
}

/// Device-bound authenticated encryption of single secrets.
pub struct CryptoEngine {
    device: Arc<dyn DeviceIdentity>,
    iterations: NonZeroU32,
}

impl std::fmt::Debug for CryptoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoEngine")
            .field("iterations", &self.iterations)
            .field("version", &CURRENT_VERSION)
            .finish_non_exhaustive()
    }
}

impl CryptoEngine {
    /// Payload version this engine reads and writes.
    pub const VERSION: u32 = CURRENT_VERSION;

    /// Build an engine from configuration.
    pub fn new(device: Arc<dyn DeviceIdentity>, config: &VaultConfig) -> Result<Self, CredvaultError> {
        Self::with_iterations(device, config.pbkdf2_iterations)
    }

    /// Build an engine with an explicit PBKDF2 iteration count.
    ///
    /// Counts below 100,000 are rejected.
    pub fn with_iterations(
        device: Arc<dyn DeviceIdentity>,
        iterations: u32,
    ) -> Result<Self, CredvaultError> {
        if iterations < MIN_PBKDF2_ITERATIONS {
            return Err(CredvaultError::Config(format!(
                "PBKDF2 iteration count must be at least {MIN_PBKDF2_ITERATIONS}, got {iterations}"
            )));
        }
        let iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| CredvaultError::Config("PBKDF2 iteration count is zero".into()))?;
        Ok(Self { device, iterations })
    }

    /// Encrypt `plaintext` under a fresh salt and nonce.
    pub async fn encrypt(&self, plaintext: &str) -> Result<EncryptedPayload, CredvaultError> {
        let material = Zeroizing::new(self.device.fingerprint());
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let iterations = self.iterations;

        let payload = tokio::task::spawn_blocking(move || {
            let salt = kdf::generate_salt()?;
            let key = kdf::derive_key(material.as_bytes(), &salt, iterations);
            let (ciphertext, iv) = crypto::seal(&key, plaintext.as_bytes())?;
            Ok::<_, CredvaultError>(EncryptedPayload {
                ciphertext: BASE64.encode(ciphertext),
                version: i64::from(CURRENT_VERSION),
                salt: BASE64.encode(salt),
                iv: BASE64.encode(iv),
            })
        })
        .await
        .map_err(|_| CredvaultError::EncryptionFailed)??;

        debug!(version = payload.version, "credential encrypted");
        Ok(payload)
    }

    /// Decrypt a payload produced by this engine version.
    ///
    /// Any other version is rejected before key derivation is attempted.
    pub async fn decrypt(&self, payload: &EncryptedPayload) -> Result<Decrypted, CredvaultError> {
        if payload.version != i64::from(CURRENT_VERSION) {
            return Err(CredvaultError::UnsupportedVersion {
                found: payload.version,
                expected: CURRENT_VERSION,
            });
        }

        let salt = decode_field(&payload.salt)?;
        let iv: [u8; NONCE_LEN] = decode_field(&payload.iv)?
            .try_into()
            .map_err(|_| CredvaultError::DecryptionFailed)?;
        let ciphertext = decode_field(&payload.ciphertext)?;
        if salt.is_empty() {
            return Err(CredvaultError::DecryptionFailed);
        }

        let material = Zeroizing::new(self.device.fingerprint());
        let iterations = self.iterations;

        let plaintext = tokio::task::spawn_blocking(move || {
            let key = kdf::derive_key(material.as_bytes(), &salt, iterations);
            let bytes = crypto::open(&key, &iv, &ciphertext)?;
            String::from_utf8(bytes).map_err(|e| {
                // Wipe the invalid buffer before reporting.
                let _ = Zeroizing::new(e.into_bytes());
                CredvaultError::DecryptionFailed
            })
        })
        .await
        .map_err(|_| CredvaultError::DecryptionFailed)??;

        debug!("credential decrypted");
        Ok(Decrypted {
            plaintext: SecretString::from(plaintext),
            was_legacy: false,
        })
    }

    /// Serialize a payload to slot text.
    pub fn serialize(payload: &EncryptedPayload) -> String {
        payload.serialize()
    }

    /// Parse slot text into a payload.
    pub fn parse(text: &str) -> Result<EncryptedPayload, CredvaultError> {
        EncryptedPayload::parse(text)
    }

    /// True when `text` parses as a payload.
    pub fn is_encrypted(text: &str) -> bool {
        crate::payload::is_encrypted(text)
    }

    /// Encrypt and serialize in one step.
    pub async fn encrypt_to_string(&self, plaintext: &str) -> Result<String, CredvaultError> {
        Ok(self.encrypt(plaintext).await?.serialize())
    }

    /// Parse and decrypt in one step, exposing the plaintext to `f`.
    pub async fn decrypt_str<T>(
        &self,
        text: &str,
        f: impl FnOnce(&str) -> T,
    ) -> Result<T, CredvaultError> {
        let decrypted = self.decrypt(&EncryptedPayload::parse(text)?).await?;
        Ok(f(decrypted.plaintext.expose_secret()))
    }
}

fn decode_field(value: &str) -> Result<Vec<u8>, CredvaultError> {
    BASE64
        .decode(value)
        .map_err(|_| CredvaultError::DecryptionFailed)
}
