// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for credvault integration tests.
//!
//! [`TestHarness`] wires a [`credvault::CredentialStore`] to a fixed device
//! identity, an in-memory (or temporary SQLite) settings store, and a
//! map-backed environment, so tests are deterministic and independent.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder, TEST_DEVICE};
