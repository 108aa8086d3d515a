// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::RwLock;

use credvault_core::{CredvaultError, KeyValueStore};
use thiserror::Error;

/// Returned when a write would push the store past its byte quota.
#[derive(Debug, Error)]
#[error("quota exceeded: {requested} bytes requested, limit is {limit}")]
pub struct QuotaExceeded {
    pub limit: usize,
    pub requested: usize,
}

/// A `HashMap`-backed store.
///
/// With a quota, the summed byte length of all keys and values may not exceed
/// the limit; writes that would do so are rejected and leave the store
/// unchanged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store limited to `limit` bytes of keys plus values.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(limit),
        }
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            quota: None,
        }
    }

    /// Total bytes currently held.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|e| e.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }
}

fn poisoned() -> CredvaultError {
    CredvaultError::Internal("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredvaultError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredvaultError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > limit {
                return Err(CredvaultError::storage(QuotaExceeded { limit, requested }));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredvaultError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}
