// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence capability.

use crate::error::CredvaultError;

/// A simple synchronous string key-value store.
///
/// Backs the host's settings slots, the audit log, and key metadata. A store
/// may reject writes (for example when a size quota is exceeded); callers
/// decide whether that is fatal.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, CredvaultError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), CredvaultError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CredvaultError>;
}
