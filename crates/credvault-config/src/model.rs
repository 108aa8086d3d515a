// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the credvault credential subsystem.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level credvault configuration.
///
/// Every section is optional and defaults to the values documented on its
/// fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredvaultConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Encryption engine settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Credential format validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Security audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Environment-variable fallback settings.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Credential slot settings.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Persistent key-value store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for CredvaultConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            vault: VaultConfig::default(),
            validation: ValidationConfig::default(),
            audit: AuditConfig::default(),
            environment: EnvironmentConfig::default(),
            credentials: CredentialsConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Encryption engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (minimum and default: 100000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Application root path folded into the device fingerprint, if known.
    #[serde(default)]
    pub app_root: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: default_pbkdf2_iterations(),
            app_root: None,
        }
    }
}

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

fn default_pbkdf2_iterations() -> u32 {
    MIN_PBKDF2_ITERATIONS
}

/// Credential format validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Shortest accepted key, in characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Longest accepted key, in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Additional placeholder substrings rejected on write (case-insensitive).
    #[serde(default)]
    pub extra_placeholders: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            extra_placeholders: Vec::new(),
        }
    }
}

fn default_min_length() -> usize {
    20
}

fn default_max_length() -> usize {
    200
}

/// Security audit log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Events older than this many days are pruned.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Maximum number of events kept (most recent win).
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// Sliding window for threshold alerts, in seconds.
    #[serde(default = "default_alert_window_secs")]
    pub alert_window_secs: u64,

    /// Decryption failures inside the window that raise a warning concern.
    #[serde(default = "default_decryption_failure_threshold")]
    pub decryption_failure_threshold: usize,

    /// Suspicious accesses inside the window that raise a critical concern.
    #[serde(default = "default_suspicious_access_threshold")]
    pub suspicious_access_threshold: usize,

    /// Key under which the event list is persisted.
    #[serde(default = "default_audit_storage_key")]
    pub storage_key: String,

    /// Event count kept when the backing store rejects a full write.
    #[serde(default = "default_fallback_events")]
    pub fallback_events: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            max_events: default_max_events(),
            alert_window_secs: default_alert_window_secs(),
            decryption_failure_threshold: default_decryption_failure_threshold(),
            suspicious_access_threshold: default_suspicious_access_threshold(),
            storage_key: default_audit_storage_key(),
            fallback_events: default_fallback_events(),
        }
    }
}

fn default_retention_days() -> u32 {
    30
}

fn default_max_events() -> usize {
    1000
}

fn default_alert_window_secs() -> u64 {
    3600
}

fn default_decryption_failure_threshold() -> usize {
    5
}

fn default_suspicious_access_threshold() -> usize {
    3
}

fn default_audit_storage_key() -> String {
    "credvault.audit_log".to_string()
}

fn default_fallback_events() -> usize {
    100
}

/// Environment-variable fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Resolve keys from environment variables when a slot is empty.
    #[serde(default)]
    pub enabled: bool,

    /// Variable name prefix, e.g. `YTC` for `YTC_GEMINI_API_KEY`.
    #[serde(default = "default_env_prefix")]
    pub prefix: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix: default_env_prefix(),
        }
    }
}

fn default_env_prefix() -> String {
    "YTC".to_string()
}

/// Credential slot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Known credential slots (key types).
    #[serde(default = "default_slots")]
    pub slots: Vec<String>,

    /// Key under which per-slot metadata is persisted.
    #[serde(default = "default_metadata_key")]
    pub metadata_key: String,

    /// Age in days after which a key is reported as due for rotation.
    #[serde(default = "default_rotation_reminder_days")]
    pub rotation_reminder_days: u32,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            metadata_key: default_metadata_key(),
            rotation_reminder_days: default_rotation_reminder_days(),
        }
    }
}

fn default_slots() -> Vec<String> {
    vec![
        "geminiApiKey".to_string(),
        "groqApiKey".to_string(),
        "ollamaApiKey".to_string(),
    ]
}

fn default_metadata_key() -> String {
    "credvault.key_metadata".to_string()
}

fn default_rotation_reminder_days() -> u32 {
    90
}

/// Persistent key-value store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite file backing the key-value store.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("credvault").join("credvault.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "credvault.db".to_string())
}
