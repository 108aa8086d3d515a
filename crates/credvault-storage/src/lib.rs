// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value persistence backends for the credvault credential subsystem.
//!
//! - [`MemoryStore`]: process-local map, optionally size-limited to emulate
//!   quota-bound host storage.
//! - [`SqliteStore`]: a single-table SQLite file for persistent hosts.

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, QuotaExceeded};
pub use sqlite::SqliteStore;
