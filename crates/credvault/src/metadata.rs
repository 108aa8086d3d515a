// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-slot key metadata used for rotation reminders.
//!
//! Stored as one JSON map under the configured metadata key. Metadata has no
//! bearing on decryption.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use credvault_core::{CredvaultError, KeyValueStore};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetadata {
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rotated: Option<DateTime<Utc>>,
    pub is_encrypted: bool,
    pub encryption_version: u32,
    pub key_type: String,
}

impl KeyMetadata {
    /// When the key was last replaced: `last_rotated` if set, else
    /// `last_modified`.
    pub fn age_reference(&self) -> DateTime<Utc> {
        self.last_rotated.unwrap_or(self.last_modified)
    }
}

pub(crate) struct MetadataStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl MetadataStore {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub(crate) fn load(&self) -> Result<BTreeMap<String, KeyMetadata>, CredvaultError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable key metadata");
            BTreeMap::new()
        }))
    }

    fn save(&self, map: &BTreeMap<String, KeyMetadata>) -> Result<(), CredvaultError> {
        if map.is_empty() {
            return self.store.remove(&self.key);
        }
        let json =
            serde_json::to_string(map).map_err(|e| CredvaultError::Internal(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    pub(crate) fn get(&self, key_type: &str) -> Result<Option<KeyMetadata>, CredvaultError> {
        Ok(self.load()?.remove(key_type))
    }

    /// Record a write of `key_type`. `rotated` stamps `last_rotated`.
    pub(crate) fn record_write(
        &self,
        key_type: &str,
        encryption_version: u32,
        rotated: bool,
    ) -> Result<(), CredvaultError> {
        let now = Utc::now();
        let mut map = self.load()?;
        let last_rotated = match map.get(key_type) {
            _ if rotated => Some(now),
            Some(existing) => existing.last_rotated,
            None => None,
        };
        map.insert(
            key_type.to_string(),
            KeyMetadata {
                last_modified: now,
                last_rotated,
                is_encrypted: true,
                encryption_version,
                key_type: key_type.to_string(),
            },
        );
        self.save(&map)
    }

    /// Mark `key_type` as encrypted without touching its modification time,
    /// for values upgraded in place.
    pub(crate) fn mark_encrypted(
        &self,
        key_type: &str,
        encryption_version: u32,
    ) -> Result<(), CredvaultError> {
        let mut map = self.load()?;
        let entry = map
            .entry(key_type.to_string())
            .or_insert_with(|| KeyMetadata {
                last_modified: Utc::now(),
                last_rotated: None,
                is_encrypted: true,
                encryption_version,
                key_type: key_type.to_string(),
            });
        entry.is_encrypted = true;
        entry.encryption_version = encryption_version;
        self.save(&map)
    }

    pub(crate) fn remove(&self, key_type: &str) -> Result<(), CredvaultError> {
        let mut map = self.load()?;
        if map.remove(key_type).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    /// Key types whose key was last replaced more than `max_age_days` ago.
    pub(crate) fn due_for_rotation(
        &self,
        max_age_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, CredvaultError> {
        let cutoff = now
            .checked_sub_signed(TimeDelta::days(i64::from(max_age_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Ok(self
            .load()?
            .into_values()
            .filter(|m| m.age_reference() < cutoff)
            .map(|m| m.key_type)
            .collect())
    }
}
