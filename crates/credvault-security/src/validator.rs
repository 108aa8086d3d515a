// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API key format validation, health checks, and masking.
//!
//! Format validation decides whether a key may be stored at all. Health
//! checks are advisory and never block storage. Both are recomputed on every
//! call.

use std::sync::LazyLock;

use credvault_config::model::ValidationConfig;
use regex::Regex;
use serde::Serialize;

/// Substrings that mark a value as an unfilled template rather than a key.
const PLACEHOLDERS: &[&str] = &[
    "your-api-key-here",
    "your_api_key_here",
    "your-api-key",
    "enter-your-key",
    "placeholder",
    "xxx",
    "...",
];

/// Substrings typical of test, demo, or sample keys.
const TEST_MARKERS: &[&str] = &["sk-test", "demo-key", "test-key", "sample", "dummy", "fake-key"];

/// Known provider key shapes. A mismatch is only a warning: providers change
/// their formats.
static PROVIDER_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("gemini", Regex::new(r"^AIza[0-9A-Za-z_\-]{35}$").unwrap()),
        ("groq", Regex::new(r"^gsk_[0-9A-Za-z]{52}$").unwrap()),
        ("anthropic", Regex::new(r"^sk-ant-[0-9A-Za-z_\-]{20,}$").unwrap()),
        ("openai", Regex::new(r"^sk-[0-9A-Za-z_\-]{20,}$").unwrap()),
    ]
});

/// Outcome of [`KeyValidator::validate_format`].
///
/// A valid result may still carry a message: a soft provider-format warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn warn(message: String) -> Self {
        Self {
            valid: true,
            message: Some(message),
        }
    }

    fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Outcome of [`KeyValidator::check_health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResult {
    pub healthy: bool,
    pub warnings: Vec<String>,
}

/// Provider name for a key type: `geminiApiKey` -> `gemini`.
pub fn provider_for(key_type: &str) -> String {
    let lower = key_type.to_ascii_lowercase();
    lower
        .strip_suffix("apikey")
        .or_else(|| lower.strip_suffix("_api_key"))
        .or_else(|| lower.strip_suffix("key"))
        .unwrap_or(&lower)
        .trim_end_matches(['_', '-'])
        .to_string()
}

/// Stateless rules for API key acceptability.
#[derive(Debug, Clone)]
pub struct KeyValidator {
    min_length: usize,
    max_length: usize,
    placeholders: Vec<String>,
}

impl Default for KeyValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl KeyValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        let placeholders = PLACEHOLDERS
            .iter()
            .map(|p| p.to_string())
            .chain(config.extra_placeholders.iter().map(|p| p.to_lowercase()))
            .collect();
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            placeholders,
        }
    }

    /// Decide whether `raw_key` may be stored for `key_type`.
    ///
    /// Lengths are counted in characters.
    pub fn validate_format(&self, key_type: &str, raw_key: &str) -> ValidationResult {
        if raw_key.trim().is_empty() {
            return ValidationResult::reject("API key is empty");
        }

        let length = raw_key.chars().count();
        if length < self.min_length {
            return ValidationResult::reject(format!(
                "API key is too short ({length} characters, minimum {})",
                self.min_length
            ));
        }
        if length > self.max_length {
            return ValidationResult::reject(format!(
                "API key is too long ({length} characters, maximum {})",
                self.max_length
            ));
        }

        let lower = raw_key.to_lowercase();
        if let Some(found) = self.placeholders.iter().find(|p| lower.contains(p.as_str())) {
            return ValidationResult::reject(format!(
                "API key looks like a placeholder (contains `{found}`)"
            ));
        }

        let provider = provider_for(key_type);
        match PROVIDER_PATTERNS.iter().find(|(name, _)| *name == provider) {
            Some((name, pattern)) if !pattern.is_match(raw_key) => ValidationResult::warn(
                format!("API key does not match the usual {name} key format; storing anyway"),
            ),
            _ => ValidationResult::ok(),
        }
    }

    /// Advisory checks for suspicious content.
    pub fn check_health(&self, _key_type: &str, raw_key: &str) -> HealthResult {
        let mut warnings = Vec::new();

        let mut chars = raw_key.chars();
        if let Some(first) = chars.next()
            && chars.all(|c| c == first)
        {
            warnings.push("API key consists of a single repeated character".to_string());
        }

        let lower = raw_key.to_lowercase();
        if let Some(marker) = TEST_MARKERS.iter().find(|m| lower.contains(*m)) {
            warnings.push(format!(
                "API key looks like a test or demo key (contains `{marker}`)"
            ));
        }

        if raw_key.trim().chars().any(char::is_whitespace) {
            warnings.push("API key contains whitespace".to_string());
        }

        HealthResult {
            healthy: warnings.is_empty(),
            warnings,
        }
    }

    /// Mask a key for display.
    ///
    /// Keys under 12 characters become `***`. Longer keys keep their first 8
    /// and last 4 characters with `*` in between, at least 8 of them.
    pub fn mask_key(raw_key: &str) -> String {
        let chars: Vec<char> = raw_key.chars().collect();
        if chars.len() < 12 {
            return "***".to_string();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        let stars = (chars.len() - 12).max(8);
        format!("{head}{}{tail}", "*".repeat(stars))
    }
}
