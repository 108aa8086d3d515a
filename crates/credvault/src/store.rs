// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential store: cache, environment fallback, encrypt-on-write and
//! decrypt-with-migration-on-read.
//!
//! Each slot in the settings store holds nothing, plain text, a legacy
//! obfuscated value, or a serialized [`EncryptedPayload`]. Reads upgrade
//! legacy values in place. Writes always store the current payload format.
//!
//! Read-path decryption failures do not surface as errors: the stored value
//! is returned as-is and the failure goes to the audit log.
//!
//! [`EncryptedPayload`]: credvault_vault::EncryptedPayload

use std::sync::Arc;

use chrono::Utc;
use credvault_audit::{AuditLog, AuditSummary, LogOptions, SecurityConcern, SecurityEventType};
use credvault_config::model::CredvaultConfig;
use credvault_core::{CredvaultError, EnvironmentSource, KeyValueStore, Severity};
use credvault_security::{forget_secret, provider_for, register_secret, KeyValidator, KnownSecrets};
use credvault_vault::{classify, CryptoEngine, MigrationCoordinator, StoredFormat};
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::KeyCache;
use crate::env::env_var_name;
use crate::metadata::{KeyMetadata, MetadataStore};
use crate::report::SecurityReport;

/// How a slot resolved on read.
enum Resolved {
    Missing,
    Cached(SecretString),
    Decrypted(SecretString),
    Migrated(SecretString),
    Plaintext(SecretString),
    Environment(SecretString),
    /// Legacy value decoded but not yet migrated.
    Legacy(SecretString),
    /// Decryption or migration failed; carries the raw stored value.
    Fallback(SecretString),
}

impl Resolved {
    fn source(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Cached(_) => "cache",
            Self::Decrypted(_) => "decrypted",
            Self::Migrated(_) => "migrated",
            Self::Plaintext(_) => "plaintext",
            Self::Environment(_) => "environment",
            Self::Legacy(_) => "legacy",
            Self::Fallback(_) => "fallback",
        }
    }

    fn secret(&self) -> Option<&SecretString> {
        match self {
            Self::Missing => None,
            Self::Cached(s)
            | Self::Decrypted(s)
            | Self::Migrated(s)
            | Self::Plaintext(s)
            | Self::Environment(s)
            | Self::Legacy(s)
            | Self::Fallback(s) => Some(s),
        }
    }

    fn into_secret(self) -> SecretString {
        match self {
            Self::Missing => empty(),
            Self::Cached(s)
            | Self::Decrypted(s)
            | Self::Migrated(s)
            | Self::Plaintext(s)
            | Self::Environment(s)
            | Self::Legacy(s)
            | Self::Fallback(s) => s,
        }
    }
}

fn empty() -> SecretString {
    SecretString::from(String::new())
}

fn copy(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// Façade over encryption, migration, validation, and auditing for a set of
/// named API key slots.
pub struct CredentialStore {
    pub(crate) config: CredvaultConfig,
    pub(crate) settings: Arc<dyn KeyValueStore>,
    pub(crate) metadata: MetadataStore,
    pub(crate) cache: Arc<KeyCache>,
    pub(crate) engine: Arc<CryptoEngine>,
    pub(crate) migration: MigrationCoordinator,
    pub(crate) validator: KeyValidator,
    pub(crate) audit: Arc<AuditLog>,
    pub(crate) environment: Arc<dyn EnvironmentSource>,
    pub(crate) known: KnownSecrets,
    pub(crate) inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("slots", &self.config.credentials.slots)
            .field("cache", &self.cache)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Resolve the API key for `key_type`.
    ///
    /// Returns an empty secret when nothing is stored and no environment
    /// variable supplies one. Only backing-store failures are errors.
    pub async fn get_api_key(&self, key_type: &str) -> Result<SecretString, CredvaultError> {
        self.check_slot(key_type);
        let resolved = self.resolve(key_type).await?;

        match &resolved {
            Resolved::Missing => debug!(key_type, "no API key configured"),
            Resolved::Fallback(_) => {}
            other => {
                debug!(key_type, source = other.source(), "API key resolved");
                self.audit.log(
                    SecurityEventType::KeyAccess,
                    "API key accessed",
                    LogOptions::default()
                        .key_type(key_type)
                        .provider(provider_for(key_type))
                        .metadata(json!({ "source": other.source() })),
                );
            }
        }

        Ok(resolved.into_secret())
    }

    /// Cache-only read.
    ///
    /// Returns the cached key, or the raw stored value when it is not an
    /// encrypted payload. Encrypted values need
    /// [`get_api_key`](Self::get_api_key) and yield an empty secret here.
    pub fn get_api_key_sync(&self, key_type: &str) -> Result<SecretString, CredvaultError> {
        if let Some(hit) = self.cache.get(key_type) {
            return Ok(hit);
        }
        let raw = self.settings.get(key_type)?.unwrap_or_default();
        if CryptoEngine::is_encrypted(&raw) {
            debug!(key_type, "encrypted API key requires async retrieval");
            return Ok(empty());
        }
        Ok(SecretString::from(raw))
    }

    /// Validate, encrypt, and store `raw_key` for `key_type`.
    ///
    /// The input is trimmed first. A key that fails format validation is
    /// rejected with [`CredvaultError::ValidationFailed`] and nothing is
    /// stored. Returns the serialized payload that was written to the slot.
    pub async fn set_api_key(
        &self,
        key_type: &str,
        raw_key: &str,
    ) -> Result<String, CredvaultError> {
        let trimmed = raw_key.trim();
        let provider = provider_for(key_type);

        let verdict = self.validator.validate_format(key_type, trimmed);
        if !verdict.valid {
            let reason = verdict
                .message
                .unwrap_or_else(|| "API key rejected".to_string());
            warn!(key_type, reason = %reason, "API key rejected");
            self.audit.log(
                SecurityEventType::ValidationFailure,
                &format!("Rejected API key: {reason}"),
                LogOptions::default().key_type(key_type).provider(&provider),
            );
            return Err(CredvaultError::ValidationFailed(reason));
        }
        if let Some(note) = &verdict.message {
            warn!(key_type, note = %note, "API key format warning");
        }
        let health = self.validator.check_health(key_type, trimmed);
        for warning in &health.warnings {
            warn!(key_type, warning = %warning, "API key health check");
        }

        let payload = match self.engine.encrypt_to_string(trimmed).await {
            Ok(payload) => payload,
            Err(e) => {
                self.audit.log(
                    SecurityEventType::EncryptionFailure,
                    "Failed to encrypt API key",
                    LogOptions::default().key_type(key_type).provider(&provider),
                );
                return Err(e);
            }
        };

        let rotated = self
            .settings
            .get(key_type)?
            .is_some_and(|previous| matches!(classify(&previous), StoredFormat::Current(_)));
        self.settings.set(key_type, &payload)?;
        self.metadata
            .record_write(key_type, CryptoEngine::VERSION, rotated)?;

        let secret = SecretString::from(trimmed.to_owned());
        self.remember(key_type, &secret);

        info!(key_type, rotated, "API key stored");
        self.audit.log(
            SecurityEventType::KeySet,
            if rotated { "API key rotated" } else { "API key stored" },
            LogOptions::default()
                .key_type(key_type)
                .provider(&provider)
                .metadata(json!({
                    "encryptionVersion": CryptoEngine::VERSION,
                    "healthy": health.healthy,
                })),
        );

        Ok(payload)
    }

    /// Empty the slot for `key_type` and drop its cache entry and metadata.
    pub async fn clear_api_key(&self, key_type: &str) -> Result<(), CredvaultError> {
        if let Some(old) = self.cache.remove(key_type) {
            forget_secret(&self.known, old.expose_secret());
        }
        self.settings.remove(key_type)?;
        self.metadata.remove(key_type)?;

        info!(key_type, "API key cleared");
        self.audit.log(
            SecurityEventType::KeyClear,
            "API key cleared",
            LogOptions::default()
                .key_type(key_type)
                .provider(provider_for(key_type)),
        );
        Ok(())
    }

    /// [`clear_api_key`](Self::clear_api_key) for every configured slot.
    pub async fn clear_all_api_keys(&self) -> Result<(), CredvaultError> {
        for slot in &self.config.credentials.slots {
            self.clear_api_key(slot).await?;
        }
        Ok(())
    }

    /// Drop every cached plaintext key. Stored values are untouched.
    pub fn clear_cache(&self) {
        self.cache.clear();
        if let Ok(mut known) = self.known.write() {
            known.clear();
        }
        debug!("credential cache cleared");
    }

    /// Check every configured slot for format, health, and storage problems.
    ///
    /// Environment-variable mode short-circuits as valid: keys are never
    /// stored in that mode. Slots are inspected read-only: legacy values are
    /// not migrated, nothing is cached, and failed decryptions are reported
    /// here instead of being written to the audit log.
    pub async fn validate_security_configuration(
        &self,
    ) -> Result<SecurityReport, CredvaultError> {
        if self.config.environment.enabled {
            return Ok(SecurityReport::environment_mode());
        }

        let mut report = SecurityReport::default();
        for slot in &self.config.credentials.slots {
            let resolved = self.inspect(slot).await?;
            match &resolved {
                Resolved::Missing => continue,
                Resolved::Fallback(_) => {
                    report
                        .errors
                        .push(format!("{slot}: stored key could not be decrypted on this device"));
                    report
                        .suggestions
                        .push(format!("Re-enter the {slot} API key"));
                    continue;
                }
                Resolved::Plaintext(_) => {
                    report
                        .warnings
                        .push(format!("{slot}: API key is stored as plain text"));
                    report
                        .suggestions
                        .push(format!("Save the {slot} API key again to encrypt it"));
                }
                Resolved::Legacy(_) => {
                    report
                        .warnings
                        .push(format!("{slot}: API key uses the legacy obfuscation format"));
                    report
                        .suggestions
                        .push(format!("Read or save the {slot} API key to upgrade its encryption"));
                }
                _ => {}
            }

            let Some(secret) = resolved.secret() else {
                continue;
            };
            let verdict = self.validator.validate_format(slot, secret.expose_secret());
            match (verdict.valid, verdict.message) {
                (false, message) => report.errors.push(format!(
                    "{slot}: {}",
                    message.unwrap_or_else(|| "invalid API key".to_string())
                )),
                (true, Some(note)) => report.warnings.push(format!("{slot}: {note}")),
                (true, None) => {}
            }
            for warning in self
                .validator
                .check_health(slot, secret.expose_secret())
                .warnings
            {
                report.warnings.push(format!("{slot}: {warning}"));
            }
        }

        for concern in self.audit.check_security_concerns() {
            if concern.severity >= Severity::Error {
                report.errors.push(concern.concern);
            } else {
                report.warnings.push(concern.concern);
            }
            report.suggestions.push(concern.recommendation);
        }

        Ok(report.finish())
    }

    pub fn get_security_summary(&self) -> AuditSummary {
        self.audit.get_summary()
    }

    pub fn get_security_concerns(&self) -> Vec<SecurityConcern> {
        self.audit.check_security_concerns()
    }

    /// Key types whose key is older than `rotation_reminder_days`.
    pub fn keys_due_for_rotation(&self) -> Result<Vec<String>, CredvaultError> {
        self.metadata
            .due_for_rotation(self.config.credentials.rotation_reminder_days, Utc::now())
    }

    pub fn key_metadata(&self, key_type: &str) -> Result<Option<KeyMetadata>, CredvaultError> {
        self.metadata.get(key_type)
    }

    /// `(key_type, masked)` for every configured slot that resolves to a key.
    pub async fn list_masked(&self) -> Result<Vec<(String, String)>, CredvaultError> {
        let mut listed = Vec::new();
        for slot in &self.config.credentials.slots {
            let resolved = self.resolve(slot).await?;
            if let Some(secret) = resolved.secret()
                && !secret.expose_secret().is_empty()
            {
                listed.push((slot.clone(), KeyValidator::mask_key(secret.expose_secret())));
            }
        }
        Ok(listed)
    }

    /// Look `key_type` up in the environment.
    ///
    /// Empty when environment mode is disabled or the variable is unset.
    pub fn get_from_environment(&self, key_type: &str) -> SecretString {
        if !self.config.environment.enabled {
            return empty();
        }
        let name = env_var_name(&self.config.environment.prefix, key_type);
        match self.environment.var(&name) {
            Some(value) if !value.trim().is_empty() => {
                debug!(key_type, variable = %name, "API key read from environment");
                SecretString::from(value.trim().to_owned())
            }
            _ => empty(),
        }
    }

    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Secrets registered for exact-match log redaction.
    pub fn known_secrets(&self) -> KnownSecrets {
        self.known.clone()
    }

    pub fn config(&self) -> &CredvaultConfig {
        &self.config
    }

    async fn resolve(&self, key_type: &str) -> Result<Resolved, CredvaultError> {
        if let Some(hit) = self.cache.get(key_type) {
            return Ok(Resolved::Cached(hit));
        }

        // Gates exist only for configured slots, so the map stays bounded.
        if !self.is_slot(key_type) {
            return self.load(key_type).await;
        }

        // One derive+decrypt per slot at a time; later callers hit the cache.
        let gate = self.inflight.entry(key_type.to_string()).or_default().clone();
        let _guard = gate.lock().await;
        self.load(key_type).await
    }

    async fn load(&self, key_type: &str) -> Result<Resolved, CredvaultError> {
        if let Some(hit) = self.cache.get(key_type) {
            return Ok(Resolved::Cached(hit));
        }

        let raw = self.settings.get(key_type)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(self.environment_or_missing(key_type));
        }

        match classify(&raw) {
            StoredFormat::Current(payload) => match self.engine.decrypt(&payload).await {
                Ok(decrypted) => {
                    self.remember(key_type, &decrypted.plaintext);
                    Ok(Resolved::Decrypted(decrypted.plaintext))
                }
                Err(e) => {
                    warn!(key_type, error = %e, "API key could not be decrypted; returning stored value");
                    self.audit.log(
                        SecurityEventType::DecryptionFailure,
                        &format!("Failed to decrypt API key: {e}"),
                        LogOptions::default()
                            .key_type(key_type)
                            .provider(provider_for(key_type)),
                    );
                    Ok(Resolved::Fallback(SecretString::from(raw)))
                }
            },
            StoredFormat::Legacy(_) => self.migrate_slot(key_type, raw).await,
            StoredFormat::Unrecognized => {
                debug!(key_type, "API key is stored as plain text");
                Ok(Resolved::Plaintext(SecretString::from(raw)))
            }
        }
    }

    /// Classify a slot the way a read would, without side effects.
    async fn inspect(&self, key_type: &str) -> Result<Resolved, CredvaultError> {
        if let Some(hit) = self.cache.get(key_type) {
            return Ok(Resolved::Cached(hit));
        }
        let raw = self.settings.get(key_type)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(self.environment_or_missing(key_type));
        }
        Ok(match classify(&raw) {
            StoredFormat::Current(payload) => match self.engine.decrypt(&payload).await {
                Ok(decrypted) => Resolved::Decrypted(decrypted.plaintext),
                Err(_) => Resolved::Fallback(SecretString::from(raw)),
            },
            StoredFormat::Legacy(_) => match self.migration.decode(&raw) {
                Some(plaintext) => Resolved::Legacy(plaintext),
                None => Resolved::Fallback(SecretString::from(raw)),
            },
            StoredFormat::Unrecognized => Resolved::Plaintext(SecretString::from(raw)),
        })
    }

    fn environment_or_missing(&self, key_type: &str) -> Resolved {
        let from_env = self.get_from_environment(key_type);
        if from_env.expose_secret().is_empty() {
            Resolved::Missing
        } else {
            Resolved::Environment(from_env)
        }
    }

    async fn migrate_slot(&self, key_type: &str, raw: String) -> Result<Resolved, CredvaultError> {
        match self.migration.migrate_value(&raw, Some(key_type)).await {
            Ok(migrated) => {
                if let Err(e) = self.settings.set(key_type, &migrated.payload) {
                    warn!(key_type, error = %e, "migrated API key not persisted");
                } else if let Err(e) = self
                    .metadata
                    .mark_encrypted(key_type, CryptoEngine::VERSION)
                {
                    warn!(key_type, error = %e, "key metadata not updated after migration");
                }
                self.remember(key_type, &migrated.plaintext);
                Ok(Resolved::Migrated(migrated.plaintext))
            }
            Err(e) => {
                warn!(key_type, error = %e, "legacy API key migration failed; returning stored value");
                Ok(Resolved::Fallback(SecretString::from(raw)))
            }
        }
    }

    fn remember(&self, key_type: &str, plaintext: &SecretString) {
        register_secret(&self.known, plaintext.expose_secret());
        self.cache.insert(key_type, copy(plaintext));
    }

    fn is_slot(&self, key_type: &str) -> bool {
        self.config
            .credentials
            .slots
            .iter()
            .any(|slot| slot == key_type)
    }

    fn check_slot(&self, key_type: &str) {
        if !self.is_slot(key_type) {
            warn!(key_type, "access to unknown key type");
            self.audit.log(
                SecurityEventType::SuspiciousAccess,
                "Access attempt for an unconfigured key type",
                LogOptions::default().key_type(key_type),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use credvault_storage::MemoryStore;
    use credvault_vault::StaticDeviceIdentity;

    use super::*;
    use crate::env::MapEnvironment;

    fn store() -> CredentialStore {
        CredentialStore::builder(CredvaultConfig::default())
            .settings(Arc::new(MemoryStore::new()))
            .device(Arc::new(StaticDeviceIdentity("unit-device".into())))
            .environment(Arc::new(MapEnvironment(HashMap::new())))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_key_types_get_no_read_gate() {
        let store = store();
        for i in 0..50 {
            store.get_api_key(&format!("madeUpKey{i}")).await.unwrap();
        }
        assert!(store.inflight.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn read_gates_are_bounded_by_configured_slots() {
        let store = Arc::new(store());
        store.settings.set("ollamaApiKey", "ollama-local-0123456789").unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let key_type = if i % 2 == 0 {
                    "ollamaApiKey".to_string()
                } else {
                    format!("madeUpKey{i}")
                };
                tokio::spawn(async move { store.get_api_key(&key_type).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.inflight.len(), 1);
        assert!(store.inflight.contains_key("ollamaApiKey"));
        assert!(store.inflight.len() <= store.config.credentials.slots.len());
    }
}
