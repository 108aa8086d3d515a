// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted API key storage for desktop and embedded hosts.
//!
//! [`CredentialStore`] is the entry point. It keeps provider API keys in a
//! host-supplied key-value store, encrypted with a device-bound key, upgrades
//! values written by the legacy obfuscation scheme on first read, validates
//! keys before storing them, and records every access in a security audit
//! log.
//!
//! ```no_run
//! # async fn run() -> Result<(), credvault::CredvaultError> {
//! use credvault::{CredentialStore, CredvaultConfig};
//! use secrecy::ExposeSecret;
//!
//! let store = CredentialStore::open(CredvaultConfig::default())?;
//! store.set_api_key("groqApiKey", "gsk_...your key...").await?;
//! let key = store.get_api_key("groqApiKey").await?;
//! assert!(!key.expose_secret().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cache;
pub mod env;
pub mod metadata;
pub mod report;
pub mod store;
pub mod telemetry;

pub use builder::CredentialStoreBuilder;
pub use cache::KeyCache;
pub use env::{env_var_name, MapEnvironment, ProcessEnvironment};
pub use metadata::KeyMetadata;
pub use report::SecurityReport;
pub use store::CredentialStore;

pub use credvault_audit::{AuditSummary, SecurityConcern, SecurityEvent, SecurityEventType};
pub use credvault_config::model::CredvaultConfig;
pub use credvault_core::{CredvaultError, DeviceIdentity, EnvironmentSource, KeyValueStore, Severity};
pub use credvault_security::{KeyValidator, KnownSecrets};
