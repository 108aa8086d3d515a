// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./credvault.toml` > `~/.config/credvault/credvault.toml` >
//! `/etc/credvault/credvault.toml`, with `CREDVAULT_*` environment overrides
//! on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::CredvaultConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CREDVAULT_";

/// Config sections that may be addressed from the environment.
const SECTIONS: &[&str] = &[
    "vault",
    "validation",
    "audit",
    "environment",
    "credentials",
    "storage",
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/credvault/credvault.toml`
/// 3. `~/.config/credvault/credvault.toml`
/// 4. `./credvault.toml`
/// 5. `CREDVAULT_*` environment variables
pub fn load_config() -> Result<CredvaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CredvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CredvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CredvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CredvaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(CredvaultConfig::default()));
    for path in config_file_paths() {
        if path.exists() {
            debug!(path = %path.display(), "config file found");
        }
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Config file locations, lowest priority first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/credvault/credvault.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("credvault").join("credvault.toml"));
    }
    paths.push(PathBuf::from("credvault.toml"));
    paths
}

/// Environment provider mapping `CREDVAULT_<SECTION>_<FIELD>` to `section.field`.
///
/// Only the leading section name is split off, so field names keep their
/// underscores: `CREDVAULT_AUDIT_STORAGE_KEY` maps to `audit.storage_key`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
