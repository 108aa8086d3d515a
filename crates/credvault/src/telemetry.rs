// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.

use credvault_core::CredvaultError;
use credvault_security::{KnownSecrets, RedactingWriter};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` overrides the default `credvault=<log_level>,warn` filter.
/// Output goes to stderr through a [`RedactingWriter`] that scrubs provider
/// key shapes and every value in `known`.
pub fn init_tracing(log_level: &str, known: KnownSecrets) -> Result<(), CredvaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("credvault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), known.clone()))
        .try_init()
        .map_err(|e| CredvaultError::Internal(format!("tracing already initialized: {e}")))
}
