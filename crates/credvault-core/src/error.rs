// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the credvault credential subsystem.
//!
//! Messages never carry secret material. Cryptographic failures in
//! particular are reported without detail so they cannot serve as an oracle.

use thiserror::Error;

/// The primary error type used across all credvault crates.
#[derive(Debug, Error)]
pub enum CredvaultError {
    /// The cipher or random source was unavailable, or sealing failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Authentication failure, malformed ciphertext, or a failed legacy decode.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Text does not have the shape of a serialized encrypted payload.
    #[error("invalid encrypted payload format")]
    InvalidFormat,

    /// Payload was produced by a different engine version.
    #[error("unsupported payload version {found} (expected {expected})")]
    UnsupportedVersion { found: i64, expected: u32 },

    /// A credential was rejected on write.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Legacy value was decoded but could not be re-encrypted.
    #[error("migration failed")]
    MigrationFailed,

    /// Backing key-value store errors (quota, I/O, database).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CredvaultError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_errors_carry_no_detail() {
        assert_eq!(CredvaultError::DecryptionFailed.to_string(), "decryption failed");
        assert_eq!(CredvaultError::EncryptionFailed.to_string(), "encryption failed");
    }

    #[test]
    fn unsupported_version_names_both_versions() {
        let err = CredvaultError::UnsupportedVersion {
            found: 7,
            expected: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains('7') && msg.contains('2'), "got: {msg}");
    }

    #[test]
    fn storage_helper_wraps_source() {
        let err = CredvaultError::storage(std::io::Error::other("quota exceeded"));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
