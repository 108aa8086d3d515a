// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the credvault configuration system.

use credvault_config::diagnostic::ConfigError;
use credvault_config::{load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
log_level = "debug"

[vault]
pbkdf2_iterations = 250000
app_root = "/home/user/vault"

[validation]
min_length = 24
max_length = 128
extra_placeholders = ["changeme"]

[audit]
retention_days = 7
max_events = 500
alert_window_secs = 600
decryption_failure_threshold = 3
suspicious_access_threshold = 2

[environment]
enabled = true
prefix = "APP"

[credentials]
slots = ["geminiApiKey"]
rotation_reminder_days = 30

[storage]
database_path = "/tmp/credvault-test.db"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.vault.pbkdf2_iterations, 250_000);
    assert_eq!(config.vault.app_root.as_deref(), Some("/home/user/vault"));
    assert_eq!(config.validation.min_length, 24);
    assert_eq!(config.validation.extra_placeholders, vec!["changeme"]);
    assert_eq!(config.audit.retention_days, 7);
    assert_eq!(config.audit.decryption_failure_threshold, 3);
    assert!(config.environment.enabled);
    assert_eq!(config.environment.prefix, "APP");
    assert_eq!(config.credentials.slots, vec!["geminiApiKey"]);
    assert_eq!(config.storage.database_path, "/tmp/credvault-test.db");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.vault.pbkdf2_iterations, 100_000);
    assert!(config.vault.app_root.is_none());
    assert_eq!(config.audit.max_events, 1000);
    assert_eq!(config.audit.fallback_events, 100);
    assert_eq!(config.credentials.metadata_key, "credvault.key_metadata");
}

#[test]
fn unknown_key_produces_suggestion() {
    let toml = "[audit]\nmax_evnts = 10\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("max_events"));
}

#[test]
fn wrong_type_produces_invalid_type() {
    let toml = "[environment]\nenabled = \"yes please\"\n";
    let errors = load_and_validate_str(toml).expect_err("wrong type must be rejected");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = "[vault]\npbkdf2_iterations = 1000\n";
    let errors = load_and_validate_str(toml).expect_err("weak KDF must be rejected");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("pbkdf2_iterations"))
    ));
}

/// `CREDVAULT_AUDIT_MAX_EVENTS` lands on `audit.max_events` and beats the file value.
#[test]
fn env_override_beats_file_value() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: credvault_config::CredvaultConfig = Figment::new()
        .merge(Serialized::defaults(
            credvault_config::CredvaultConfig::default(),
        ))
        .merge(Toml::string("[audit]\nmax_events = 7\n"))
        .merge(("audit.max_events", 42))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.audit.max_events, 42);
}

/// Missing config files are skipped rather than treated as errors.
#[test]
fn missing_config_file_is_skipped() {
    let config = credvault_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/credvault/credvault.toml",
    ))
    .expect("missing file should fall back to defaults");
    assert_eq!(config.audit.storage_key, "credvault.audit_log");
}
