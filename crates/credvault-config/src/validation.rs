// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: cryptographic minimums,
//! ordered length bounds, non-zero thresholds, and well-formed names.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{CredvaultConfig, MIN_PBKDF2_ITERATIONS};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first.
pub fn validate_config(config: &CredvaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.vault.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
        fail(format!(
            "vault.pbkdf2_iterations must be at least {MIN_PBKDF2_ITERATIONS}, got {}",
            config.vault.pbkdf2_iterations
        ));
    }

    let validation = &config.validation;
    if validation.min_length == 0 {
        fail("validation.min_length must be at least 1".to_string());
    }
    if validation.min_length > validation.max_length {
        fail(format!(
            "validation.min_length ({}) must not exceed validation.max_length ({})",
            validation.min_length, validation.max_length
        ));
    }
    if validation.extra_placeholders.iter().any(|p| p.trim().is_empty()) {
        fail("validation.extra_placeholders must not contain empty entries".to_string());
    }

    let audit = &config.audit;
    if audit.decryption_failure_threshold == 0 {
        fail("audit.decryption_failure_threshold must be at least 1".to_string());
    }
    if audit.suspicious_access_threshold == 0 {
        fail("audit.suspicious_access_threshold must be at least 1".to_string());
    }
    if audit.alert_window_secs == 0 {
        fail("audit.alert_window_secs must be at least 1".to_string());
    }
    if audit.fallback_events == 0 {
        fail("audit.fallback_events must be at least 1".to_string());
    }
    if audit.max_events < audit.fallback_events {
        fail(format!(
            "audit.max_events ({}) must be at least audit.fallback_events ({})",
            audit.max_events, audit.fallback_events
        ));
    }
    if audit.storage_key.trim().is_empty() {
        fail("audit.storage_key must not be empty".to_string());
    }

    let prefix = &config.environment.prefix;
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        fail(format!(
            "environment.prefix `{prefix}` must be non-empty and contain only A-Z, 0-9 or `_`"
        ));
    }

    let credentials = &config.credentials;
    if credentials.metadata_key.trim().is_empty() {
        fail("credentials.metadata_key must not be empty".to_string());
    }
    if credentials.metadata_key == audit.storage_key {
        fail("credentials.metadata_key must differ from audit.storage_key".to_string());
    }
    let mut seen = HashSet::new();
    for (i, slot) in credentials.slots.iter().enumerate() {
        if slot.trim().is_empty() {
            fail(format!("credentials.slots[{i}] must not be empty"));
        } else if !seen.insert(slot.as_str()) {
            fail(format!("duplicate credential slot `{slot}`"));
        } else if *slot == audit.storage_key || *slot == credentials.metadata_key {
            fail(format!(
                "credential slot `{slot}` collides with a reserved storage key"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CredvaultConfig::default()).is_ok());
    }

    #[test]
    fn low_iteration_count_fails_validation() {
        let mut config = CredvaultConfig::default();
        config.vault.pbkdf2_iterations = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "pbkdf2_iterations"));
    }

    #[test]
    fn inverted_length_window_fails_validation() {
        let mut config = CredvaultConfig::default();
        config.validation.min_length = 300;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must not exceed"));
    }

    #[test]
    fn slot_named_like_a_reserved_key_fails_validation() {
        let mut config = CredvaultConfig::default();
        config.credentials.slots.push("credvault.audit_log".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "reserved storage key"));
    }

    #[test]
    fn zero_thresholds_fail_validation() {
        let mut config = CredvaultConfig::default();
        config.audit.decryption_failure_threshold = 0;
        config.audit.suspicious_access_threshold = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "decryption_failure_threshold"));
        assert!(has_error(&errors, "suspicious_access_threshold"));
    }

    #[test]
    fn lowercase_prefix_fails_validation() {
        let mut config = CredvaultConfig::default();
        config.environment.prefix = "ytc".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "environment.prefix"));
    }

    #[test]
    fn duplicate_slots_fail_validation() {
        let mut config = CredvaultConfig::default();
        config.credentials.slots = vec!["groqApiKey".into(), "groqApiKey".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "duplicate credential slot"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = CredvaultConfig::default();
        config.vault.pbkdf2_iterations = 1;
        config.storage.database_path = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
