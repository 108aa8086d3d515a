// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-variable lookup capability.

/// Source of environment variables for the credential fallback path.
pub trait EnvironmentSource: Send + Sync {
    /// Returns the value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;
}
