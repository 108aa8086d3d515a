// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory plaintext cache for resolved API keys.

use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};

/// Plaintext keys by key type, held for the lifetime of the owning store.
///
/// Values are [`SecretString`]s, so they are zeroized when removed or when
/// the cache is dropped. Nothing here is ever persisted.
#[derive(Default)]
pub struct KeyCache {
    entries: DashMap<String, SecretString>,
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the cached key for `key_type`.
    pub fn get(&self, key_type: &str) -> Option<SecretString> {
        self.entries
            .get(key_type)
            .map(|entry| SecretString::from(entry.value().expose_secret().to_owned()))
    }

    pub fn insert(&self, key_type: &str, plaintext: SecretString) {
        self.entries.insert(key_type.to_string(), plaintext);
    }

    pub fn remove(&self, key_type: &str) -> Option<SecretString> {
        self.entries.remove(key_type).map(|(_, v)| v)
    }

    pub fn contains(&self, key_type: &str) -> bool {
        self.entries.contains_key(key_type)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
