// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security event types and records.

use chrono::{DateTime, Utc};
use credvault_core::Severity;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Category of a recorded security event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecurityEventType {
    KeyAccess,
    KeySet,
    KeyClear,
    DecryptionFailure,
    EncryptionFailure,
    MigrationSuccess,
    MigrationFailure,
    SuspiciousAccess,
    ValidationFailure,
}

impl SecurityEventType {
    /// Severity used when the caller does not supply one.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::KeyAccess | Self::KeySet | Self::KeyClear | Self::MigrationSuccess => {
                Severity::Info
            }
            Self::DecryptionFailure | Self::ValidationFailure | Self::SuspiciousAccess => {
                Severity::Warning
            }
            Self::EncryptionFailure | Self::MigrationFailure => Severity::Error,
        }
    }
}

/// A single audit record.
///
/// `message` and `metadata` must never contain key material; messages are
/// additionally passed through redaction before being stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    #[serde(rename = "type")]
    pub event_type: SecurityEventType,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Optional fields for [`crate::AuditLog::log`].
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub severity: Option<Severity>,
    pub key_type: Option<String>,
    pub provider: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl LogOptions {
    pub fn key_type(mut self, key_type: impl Into<String>) -> Self {
        self.key_type = Some(key_type.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn event_type_wire_names() {
        assert_eq!(SecurityEventType::DecryptionFailure.to_string(), "decryption_failure");
        assert_eq!(
            SecurityEventType::from_str("migration_success").unwrap(),
            SecurityEventType::MigrationSuccess
        );
        let json = serde_json::to_string(&SecurityEventType::SuspiciousAccess).unwrap();
        assert_eq!(json, "\"suspicious_access\"");
    }

    #[test]
    fn every_type_has_a_default_severity() {
        for t in SecurityEventType::iter() {
            let _ = t.default_severity();
        }
        assert_eq!(SecurityEventType::KeyAccess.default_severity(), Severity::Info);
        assert_eq!(SecurityEventType::MigrationFailure.default_severity(), Severity::Error);
    }

    #[test]
    fn event_serializes_without_empty_optionals() {
        let event = SecurityEvent {
            event_type: SecurityEventType::KeySet,
            timestamp: Utc::now(),
            severity: Severity::Info,
            key_type: Some("groqApiKey".into()),
            provider: None,
            message: "API key stored".into(),
            metadata: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "key_set");
        assert_eq!(json["keyType"], "groqApiKey");
        assert!(json.get("provider").is_none());
        let back: SecurityEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
