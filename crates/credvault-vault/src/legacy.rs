// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The predecessor obfuscation scheme.
//!
//! Values were XORed byte-for-byte with a key obtained by a single SHA-256
//! over the device fingerprint (no salt, no stretching), repeated cyclically,
//! then base64-encoded. This module only reads that format back; new values
//! are always written by [`crate::engine::CryptoEngine`].

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use credvault_core::DeviceIdentity;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::payload::{classify, StoredFormat};

/// Decoder for legacy XOR-obfuscated values.
#[derive(Clone)]
pub struct LegacyCodec {
    device: Arc<dyn DeviceIdentity>,
}

impl std::fmt::Debug for LegacyCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyCodec").finish_non_exhaustive()
    }
}

impl LegacyCodec {
    pub fn new(device: Arc<dyn DeviceIdentity>) -> Self {
        Self { device }
    }

    /// Legacy key bytes: one unsalted SHA-256 over the fingerprint.
    fn key(&self) -> Zeroizing<Vec<u8>> {
        let fingerprint = Zeroizing::new(self.device.fingerprint());
        Zeroizing::new(Sha256::digest(fingerprint.as_bytes()).to_vec())
    }

    fn xor(&self, data: &mut [u8]) {
        let key = self.key();
        for (byte, k) in data.iter_mut().zip(key.iter().cycle()) {
            *byte ^= k;
        }
    }

    /// Recover the plaintext of a legacy value.
    ///
    /// Returns an empty string on any failure: invalid base64, or a result
    /// that is not clean UTF-8 text (which is what a wrong device key or a
    /// plaintext value mistaken for legacy produces).
    pub fn deobfuscate(&self, text: &str) -> String {
        let Ok(bytes) = BASE64.decode(text.trim()) else {
            return String::new();
        };
        let mut bytes = Zeroizing::new(bytes);
        self.xor(&mut bytes);
        match std::str::from_utf8(&bytes) {
            Ok(s) if !s.chars().any(char::is_control) => s.to_string(),
            _ => String::new(),
        }
    }

    /// Produce a legacy value. Only used to build fixtures for old-format data.
    pub fn obfuscate(&self, plaintext: &str) -> String {
        let mut bytes = Zeroizing::new(plaintext.as_bytes().to_vec());
        self.xor(&mut bytes);
        BASE64.encode(bytes.as_slice())
    }

    /// True when `text` is base64 and not an encrypted payload.
    pub fn is_legacy(text: &str) -> bool {
        matches!(classify(text), StoredFormat::Legacy(_))
    }
}
