// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device identity capability.

/// Provides the stable, device-specific material that encryption keys are
/// derived from.
///
/// The returned string must be identical across process restarts on the same
/// device; ciphertext produced under one identity cannot be opened under
/// another.
pub trait DeviceIdentity: Send + Sync {
    /// Returns the opaque fingerprint material for this device.
    fn fingerprint(&self) -> String;
}
