// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capabilities the host application injects into the credential subsystem.
//!
//! Nothing in credvault touches global state directly: persistence, device
//! attributes, and environment lookup all arrive through these traits.

pub mod device;
pub mod environment;
pub mod store;

pub use device::DeviceIdentity;
pub use environment::EnvironmentSource;
pub use store::KeyValueStore;
