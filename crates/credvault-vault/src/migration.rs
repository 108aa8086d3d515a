// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-way upgrade of legacy obfuscated values to the current payload format.

use std::sync::Arc;

use credvault_audit::{AuditLog, LogOptions, SecurityEventType};
use credvault_core::CredvaultError;
use secrecy::SecretString;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::engine::CryptoEngine;
use crate::legacy::LegacyCodec;
use crate::payload::is_encrypted;

/// Result of a successful migration.
pub struct Migrated {
    /// Serialized current-version payload, ready to persist.
    pub payload: String,
    /// Recovered plaintext, so callers need not decrypt again.
    pub plaintext: SecretString,
}

impl std::fmt::Debug for Migrated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrated")
            .field("payload", &self.payload)
            .field("plaintext", &"[REDACTED]")
            .finish()
    }
}

/// Detects legacy values and re-encrypts them, auditing each attempt.
#[derive(Debug)]
pub struct MigrationCoordinator {
    engine: Arc<CryptoEngine>,
    legacy: LegacyCodec,
    audit: Arc<AuditLog>,
}

impl MigrationCoordinator {
    pub fn new(engine: Arc<CryptoEngine>, legacy: LegacyCodec, audit: Arc<AuditLog>) -> Self {
        Self {
            engine,
            legacy,
            audit,
        }
    }

    /// True when `value` is in the legacy format and not already encrypted.
    pub fn needs_migration(value: &str) -> bool {
        LegacyCodec::is_legacy(value) && !is_encrypted(value)
    }

    /// Recover the plaintext of a legacy value without re-encrypting it.
    ///
    /// Nothing is audited. `None` when the value does not decode on this device.
    pub fn decode(&self, value: &str) -> Option<SecretString> {
        let plaintext = Zeroizing::new(self.legacy.deobfuscate(value));
        (!plaintext.is_empty()).then(|| SecretString::from(plaintext.as_str().to_owned()))
    }

    /// Re-encrypt a legacy value and return the new serialized payload.
    pub async fn migrate(&self, value: &str) -> Result<String, CredvaultError> {
        Ok(self.migrate_value(value, None).await?.payload)
    }

    /// Like [`migrate`](Self::migrate), also returning the recovered plaintext.
    ///
    /// `key_type` is attached to the audit events when known.
    pub async fn migrate_value(
        &self,
        value: &str,
        key_type: Option<&str>,
    ) -> Result<Migrated, CredvaultError> {
        let options = || match key_type {
            Some(kt) => LogOptions::default().key_type(kt),
            None => LogOptions::default(),
        };

        let plaintext = Zeroizing::new(self.legacy.deobfuscate(value));
        if plaintext.is_empty() {
            warn!(key_type, "legacy value could not be decoded");
            self.audit.log(
                SecurityEventType::MigrationFailure,
                "Legacy value could not be decoded on this device",
                options().metadata(json!({ "stage": "decode" })),
            );
            return Err(CredvaultError::DecryptionFailed);
        }

        let payload = match self.engine.encrypt_to_string(&plaintext).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key_type, error = %e, "re-encryption of legacy value failed");
                self.audit.log(
                    SecurityEventType::MigrationFailure,
                    "Re-encryption of legacy value failed",
                    options().metadata(json!({ "stage": "encrypt" })),
                );
                return Err(CredvaultError::MigrationFailed);
            }
        };

        info!(key_type, version = CryptoEngine::VERSION, "legacy credential migrated");
        self.audit.log(
            SecurityEventType::MigrationSuccess,
            &format!("Migrated legacy value to v{}", CryptoEngine::VERSION),
            options().metadata(json!({ "toVersion": CryptoEngine::VERSION })),
        );

        Ok(Migrated {
            payload,
            plaintext: SecretString::from(plaintext.as_str().to_owned()),
        })
    }
}
