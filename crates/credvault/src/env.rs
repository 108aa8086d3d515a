// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-variable key sources.
//!
//! Key type `geminiApiKey` with prefix `YTC` resolves to `YTC_GEMINI_API_KEY`.

use std::collections::HashMap;

use credvault_core::EnvironmentSource;

/// Variable name for `key_type` under `prefix`.
///
/// The key type is upper-cased and its `APIKEY` suffix spelled `_API_KEY`.
pub fn env_var_name(prefix: &str, key_type: &str) -> String {
    let upper = key_type.to_ascii_uppercase();
    let name = match upper.strip_suffix("APIKEY") {
        Some(stem) => format!("{}_API_KEY", stem.trim_end_matches('_')),
        None => upper,
    };
    format!("{prefix}_{name}")
}

/// Reads the process environment, then an optional host-supplied map.
///
/// The map plays the part of an injected runtime config object for hosts
/// that cannot set real environment variables.
#[derive(Debug, Default, Clone)]
pub struct ProcessEnvironment {
    fallback: HashMap<String, String>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: HashMap<String, String>) -> Self {
        Self { fallback }
    }
}

impl EnvironmentSource for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.fallback.get(name).cloned())
    }
}

/// A fixed map of variables. Never consults the process environment.
#[derive(Debug, Default, Clone)]
pub struct MapEnvironment(pub HashMap<String, String>);

impl EnvironmentSource for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
