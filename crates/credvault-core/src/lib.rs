// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the credvault credential subsystem.
//!
//! This crate provides the error taxonomy, the capability traits a host
//! application supplies (key-value persistence, device identity, environment
//! lookup), and the small shared types used by every other credvault crate.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CredvaultError;
pub use traits::{DeviceIdentity, EnvironmentSource, KeyValueStore};
pub use types::Severity;
