// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed key-value store.
//!
//! One `kv` table, created on open. All access goes through a single
//! connection behind a mutex; writes are small and infrequent.

use std::path::Path;
use std::sync::Mutex;

use credvault_core::{CredvaultError, KeyValueStore};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// Persistent store for production hosts.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredvaultError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(CredvaultError::storage)?;
        }
        let conn = Connection::open(path).map_err(CredvaultError::storage)?;
        Self::init(conn, path.display().to_string())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, CredvaultError> {
        let conn = Connection::open_in_memory().map_err(CredvaultError::storage)?;
        Self::init(conn, ":memory:".to_string())
    }

    fn init(conn: Connection, label: String) -> Result<Self, CredvaultError> {
        // In-memory databases answer "memory"; the mode is advisory there.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(CredvaultError::storage)?;
        conn.execute(SCHEMA, []).map_err(CredvaultError::storage)?;
        debug!(path = %label, "key-value store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, CredvaultError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CredvaultError::Internal("sqlite store lock poisoned".to_string()))?;
        f(&conn).map_err(CredvaultError::storage)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredvaultError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredvaultError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredvaultError> {
        self.with_conn(|conn| conn.execute("DELETE FROM kv WHERE key = ?1", params![key]).map(|_| ()))
    }
}
