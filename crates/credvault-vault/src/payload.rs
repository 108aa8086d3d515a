// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialized payload format and stored-value classification.
//!
//! A credential slot holds one of: nothing, plaintext, a legacy
//! XOR-obfuscated string, or a JSON object with exactly four fields
//! (`ciphertext`, `version`, `salt`, `iv`). [`classify`] tells them apart in
//! one structural pass.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use credvault_core::CredvaultError;
use serde::{Deserialize, Serialize};

/// Version stamped on every payload the current engine produces.
///
/// The XOR scheme handled by [`crate::legacy`] is the implicit version 1.
pub const CURRENT_VERSION: u32 = 2;

/// An encrypted credential. Binary fields are standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedPayload {
    /// AES-256-GCM ciphertext with the authentication tag appended.
    pub ciphertext: String,
    /// Engine version that produced the payload.
    ///
    /// Signed so that any integer found in storage still parses and is
    /// rejected by the version check rather than misread as plain text.
    pub version: i64,
    /// PBKDF2 salt.
    pub salt: String,
    /// AES-GCM nonce.
    pub iv: String,
}

impl EncryptedPayload {
    /// Serialize to the compact JSON text stored in a credential slot.
    pub fn serialize(&self) -> String {
        // Four string/integer fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse stored text, accepting only the exact four-field shape.
    pub fn parse(text: &str) -> Result<Self, CredvaultError> {
        serde_json::from_str(text.trim()).map_err(|_| CredvaultError::InvalidFormat)
    }
}

/// What a stored credential value turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredFormat {
    /// A structurally valid encrypted payload (any version).
    Current(EncryptedPayload),
    /// Base64 text that is not a payload: the legacy obfuscation scheme.
    Legacy(Vec<u8>),
    /// Anything else, including plaintext keys and empty values.
    Unrecognized,
}

/// Classify a stored value.
///
/// Anything that parses as an [`EncryptedPayload`] is `Current`, never
/// `Legacy`. Text that looks like a JSON object but fails the shape check is
/// `Unrecognized` rather than a legacy candidate.
pub fn classify(text: &str) -> StoredFormat {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return StoredFormat::Unrecognized;
    }
    if let Ok(payload) = EncryptedPayload::parse(trimmed) {
        return StoredFormat::Current(payload);
    }
    if trimmed.starts_with('{') {
        return StoredFormat::Unrecognized;
    }
    match BASE64.decode(trimmed) {
        Ok(bytes) if !bytes.is_empty() => StoredFormat::Legacy(bytes),
        _ => StoredFormat::Unrecognized,
    }
}

/// True when `text` is a structurally valid encrypted payload.
pub fn is_encrypted(text: &str) -> bool {
    matches!(classify(text), StoredFormat::Current(_))
}
