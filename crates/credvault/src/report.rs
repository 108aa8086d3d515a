// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security configuration report.

use serde::Serialize;

/// Result of [`crate::CredentialStore::validate_security_configuration`].
///
/// Entries name key types and describe findings; they never contain key
/// material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub is_valid: bool,
    pub environment_mode: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl SecurityReport {
    pub(crate) fn environment_mode() -> Self {
        Self {
            is_valid: true,
            environment_mode: true,
            suggestions: vec![
                "API keys are read from environment variables and never stored".to_string(),
            ],
            ..Self::default()
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }
}
