//! SQLite-backed key-value store.
//!
//! All app state lives in a single `kv` table; each logical record is one
//! row holding a JSON or plain-text value.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::{CoreError, StorageError};

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "onebigthing.db";

/// SQLite database for key-value storage.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `~/.config/onebigthing/onebigthing.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join(DB_FILE_NAME);
        Ok(Self::open_at(&path)?)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = SqliteStore::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn remove_is_idempotent() {
        let db = SqliteStore::open_memory().unwrap();
        db.set("gone", "1").unwrap();
        db.remove("gone").unwrap();
        db.remove("gone").unwrap();
        assert!(db.get("gone").unwrap().is_none());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        {
            let db = SqliteStore::open_at(&path).unwrap();
            db.set("streak", "3").unwrap();
        }
        let db = SqliteStore::open_at(&path).unwrap();
        assert_eq!(db.get("streak").unwrap().as_deref(), Some("3"));
    }
}
