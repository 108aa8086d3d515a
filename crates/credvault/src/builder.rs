// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of a [`CredentialStore`] from configuration and injected
//! capabilities.

use std::sync::Arc;

use credvault_audit::AuditLog;
use credvault_config::model::CredvaultConfig;
use credvault_core::{CredvaultError, DeviceIdentity, EnvironmentSource, KeyValueStore};
use credvault_security::{KeyValidator, KnownSecrets};
use credvault_storage::SqliteStore;
use credvault_vault::{CryptoEngine, HostDeviceIdentity, LegacyCodec, MigrationCoordinator};
use dashmap::DashMap;
use tracing::info;

use crate::cache::KeyCache;
use crate::env::ProcessEnvironment;
use crate::metadata::MetadataStore;
use crate::store::CredentialStore;

/// Builder for [`CredentialStore`].
///
/// Anything not supplied falls back to the production default: a SQLite
/// settings store at `storage.database_path`, the host device identity, the
/// process environment, and a fresh cache.
pub struct CredentialStoreBuilder {
    config: CredvaultConfig,
    settings: Option<Arc<dyn KeyValueStore>>,
    device: Option<Arc<dyn DeviceIdentity>>,
    environment: Option<Arc<dyn EnvironmentSource>>,
    cache: Option<Arc<KeyCache>>,
    known: Option<KnownSecrets>,
}

impl CredentialStoreBuilder {
    pub(crate) fn new(config: CredvaultConfig) -> Self {
        Self {
            config,
            settings: None,
            device: None,
            environment: None,
            cache: None,
            known: None,
        }
    }

    /// Store holding credential slots, key metadata, and the audit log.
    pub fn settings(mut self, settings: Arc<dyn KeyValueStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn device(mut self, device: Arc<dyn DeviceIdentity>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn environment(mut self, environment: Arc<dyn EnvironmentSource>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn cache(mut self, cache: Arc<KeyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share a redaction list, typically the one passed to
    /// [`init_tracing`](crate::telemetry::init_tracing).
    pub fn known_secrets(mut self, known: KnownSecrets) -> Self {
        self.known = Some(known);
        self
    }

    pub fn build(self) -> Result<CredentialStore, CredvaultError> {
        let config = self.config;
        let settings = match self.settings {
            Some(settings) => settings,
            None => Arc::new(SqliteStore::open(&config.storage.database_path)?),
        };
        let device = self
            .device
            .unwrap_or_else(|| Arc::new(HostDeviceIdentity::new(&config.vault)));
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(ProcessEnvironment::new()));

        let engine = Arc::new(CryptoEngine::new(device.clone(), &config.vault)?);
        let audit = Arc::new(AuditLog::new(settings.clone(), &config.audit));
        let migration =
            MigrationCoordinator::new(engine.clone(), LegacyCodec::new(device), audit.clone());

        info!(
            slots = config.credentials.slots.len(),
            environment_mode = config.environment.enabled,
            "credential store ready"
        );

        Ok(CredentialStore {
            metadata: MetadataStore::new(settings.clone(), &config.credentials.metadata_key),
            validator: KeyValidator::new(&config.validation),
            cache: self.cache.unwrap_or_default(),
            known: self.known.unwrap_or_default(),
            inflight: DashMap::new(),
            settings,
            engine,
            migration,
            audit,
            environment,
            config,
        })
    }
}

impl CredentialStore {
    pub fn builder(config: CredvaultConfig) -> CredentialStoreBuilder {
        CredentialStoreBuilder::new(config)
    }

    /// Open with production defaults for everything not in `config`.
    pub fn open(config: CredvaultConfig) -> Result<Self, CredvaultError> {
        Self::builder(config).build()
    }
}
