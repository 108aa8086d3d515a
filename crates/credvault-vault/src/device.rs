// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device fingerprinting.
//!
//! Ciphertext is bound to the device that produced it: keys are derived from
//! a hash of stable host attributes, so a copied settings file cannot be
//! opened elsewhere.

use credvault_config::model::VaultConfig;
use credvault_core::DeviceIdentity;
use sha2::{Digest, Sha256};

/// Domain separator mixed into every fingerprint.
const FINGERPRINT_DOMAIN: &str = "credvault-device-v1";

/// Observable host attributes that make up a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttributes {
    /// Operating system, family and architecture, e.g. `linux/unix/x86_64`.
    pub platform: String,
    /// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`.
    pub locale: String,
    /// Time zone name from `TZ` or `/etc/timezone`.
    pub timezone: String,
    /// Host name.
    pub hostname: String,
    /// Application root path, when the host provides one.
    pub app_root: Option<String>,
}

impl DeviceAttributes {
    /// Read the attributes of the current host.
    pub fn detect(app_root: Option<String>) -> Self {
        Self {
            platform: format!(
                "{}/{}/{}",
                std::env::consts::OS,
                std::env::consts::FAMILY,
                std::env::consts::ARCH
            ),
            locale: first_env(&["LC_ALL", "LC_MESSAGES", "LANG"]).unwrap_or_else(|| "C".into()),
            timezone: first_env(&["TZ"])
                .or_else(|| read_trimmed("/etc/timezone"))
                .unwrap_or_else(|| "UTC".into()),
            hostname: first_env(&["HOSTNAME", "COMPUTERNAME"])
                .or_else(|| read_trimmed("/etc/hostname"))
                .unwrap_or_else(|| "localhost".into()),
            app_root,
        }
    }

    /// Hex SHA-256 of the concatenated attributes.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            FINGERPRINT_DOMAIN,
            self.platform.as_str(),
            self.locale.as_str(),
            self.timezone.as_str(),
            self.hostname.as_str(),
            self.app_root.as_deref().unwrap_or(""),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(b"|");
        }
        hex::encode(hasher.finalize())
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn read_trimmed(path: &str) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Fingerprint of the running host, computed once at construction.
#[derive(Debug, Clone)]
pub struct HostDeviceIdentity {
    fingerprint: String,
}

impl HostDeviceIdentity {
    pub fn new(config: &VaultConfig) -> Self {
        Self::from_attributes(&DeviceAttributes::detect(config.app_root.clone()))
    }

    pub fn from_attributes(attributes: &DeviceAttributes) -> Self {
        Self {
            fingerprint: attributes.fingerprint(),
        }
    }
}

impl DeviceIdentity for HostDeviceIdentity {
    fn fingerprint(&self) -> String {
        self.fingerprint.clone()
    }
}

/// A fixed fingerprint, for tests and hosts that manage identity themselves.
#[derive(Debug, Clone)]
pub struct StaticDeviceIdentity(pub String);

impl DeviceIdentity for StaticDeviceIdentity {
    fn fingerprint(&self) -> String {
        self.0.clone()
    }
}
