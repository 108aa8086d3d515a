// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-bound credential encryption for the credvault credential subsystem.
//!
//! Credentials are sealed with AES-256-GCM under a key derived by
//! PBKDF2-HMAC-SHA256 from the device fingerprint and a per-value random salt.
//! Values written by the previous XOR obfuscation scheme are recognised and
//! upgraded on first read.
//!
//! Key derivation is CPU-bound and always runs on the blocking thread pool.

pub mod crypto;
pub mod device;
pub mod engine;
pub mod kdf;
pub mod legacy;
pub mod migration;
pub mod payload;

pub use device::{DeviceAttributes, HostDeviceIdentity, StaticDeviceIdentity};
pub use engine::{CryptoEngine, Decrypted};
pub use legacy::LegacyCodec;
pub use migration::{Migrated, MigrationCoordinator};
pub use payload::{classify, is_encrypted, EncryptedPayload, StoredFormat, CURRENT_VERSION};
