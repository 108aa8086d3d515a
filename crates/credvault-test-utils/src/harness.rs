// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-wired credential store for tests.

use std::collections::HashMap;
use std::sync::Arc;

use credvault::{CredentialStore, MapEnvironment};
use credvault_config::model::CredvaultConfig;
use credvault_core::{CredvaultError, DeviceIdentity, KeyValueStore};
use credvault_storage::{MemoryStore, SqliteStore};
use credvault_vault::{LegacyCodec, StaticDeviceIdentity};

/// Fingerprint used by harness stores unless overridden.
pub const TEST_DEVICE: &str = "credvault-test-device";

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: CredvaultConfig,
    fingerprint: String,
    settings: Option<Arc<dyn KeyValueStore>>,
    env: HashMap<String, String>,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: CredvaultConfig::default(),
            fingerprint: TEST_DEVICE.to_string(),
            settings: None,
            env: HashMap::new(),
            sqlite: false,
        }
    }

    pub fn with_config(mut self, config: CredvaultConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different device fingerprint.
    pub fn with_device(mut self, fingerprint: &str) -> Self {
        self.fingerprint = fingerprint.to_string();
        self
    }

    /// Share an existing settings store, e.g. to simulate a restart.
    pub fn with_settings(mut self, settings: Arc<dyn KeyValueStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Enable environment mode with the given variables.
    pub fn with_env(mut self, vars: &[(&str, &str)]) -> Self {
        self.config.environment.enabled = true;
        self.env = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Back the settings with a SQLite file in a temporary directory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    pub fn build(self) -> Result<TestHarness, CredvaultError> {
        let temp_dir = tempfile::TempDir::new().map_err(CredvaultError::storage)?;
        let settings: Arc<dyn KeyValueStore> = match self.settings {
            Some(settings) => settings,
            None if self.sqlite => {
                Arc::new(SqliteStore::open(temp_dir.path().join("credvault.db"))?)
            }
            None => Arc::new(MemoryStore::new()),
        };
        let device: Arc<dyn DeviceIdentity> = Arc::new(StaticDeviceIdentity(self.fingerprint));

        let store = CredentialStore::builder(self.config)
            .settings(settings.clone())
            .device(device.clone())
            .environment(Arc::new(MapEnvironment(self.env)))
            .build()?;

        Ok(TestHarness {
            store,
            settings,
            device,
            _temp_dir: temp_dir,
        })
    }
}

/// A credential store plus direct access to what backs it.
pub struct TestHarness {
    pub store: CredentialStore,
    pub settings: Arc<dyn KeyValueStore>,
    pub device: Arc<dyn DeviceIdentity>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default harness over an in-memory store.
    pub fn new() -> Result<Self, CredvaultError> {
        Self::builder().build()
    }

    /// Raw slot value as the host would see it.
    pub fn raw(&self, key_type: &str) -> Option<String> {
        self.settings.get(key_type).ok().flatten()
    }

    /// Write a raw slot value, bypassing the store.
    pub fn put_raw(&self, key_type: &str, value: &str) -> Result<(), CredvaultError> {
        self.settings.set(key_type, value)
    }

    /// Obfuscate `plaintext` with this harness's device, as the legacy scheme
    /// did.
    pub fn legacy_value(&self, plaintext: &str) -> String {
        LegacyCodec::new(self.device.clone()).obfuscate(plaintext)
    }

    /// A fresh store over the same settings and device: an empty cache, as
    /// after a process restart.
    pub fn restart(&self) -> Result<CredentialStore, CredvaultError> {
        CredentialStore::builder(self.store.config().clone())
            .settings(self.settings.clone())
            .device(self.device.clone())
            .environment(Arc::new(MapEnvironment::default()))
            .build()
    }
}
