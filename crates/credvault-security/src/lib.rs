// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential hygiene for the credvault credential subsystem.
//!
//! Stateless format validation and health checks for API keys, display
//! masking, and redaction of secret-shaped text before it reaches logs.

pub mod redact;
pub mod validator;

pub use redact::{forget_secret, redact, register_secret, KnownSecrets, RedactingWriter, REDACTED};
pub use validator::{provider_for, HealthResult, KeyValidator, ValidationResult};
