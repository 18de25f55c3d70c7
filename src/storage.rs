//! SQLite key-value store for the persisted game snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::game::GameSnapshot;

/// Fixed key the game snapshot lives under
pub const SNAPSHOT_KEY: &str = "mimica-store";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// `<data dir>/mimica`, falling back to the working directory
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("mimica"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_db_path() -> PathBuf {
    data_dir().join("mimica.db")
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (and create if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened store");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Load the persisted snapshot. A value that doesn't parse is logged
    /// and treated as missing.
    pub fn load_snapshot(&self) -> Result<Option<GameSnapshot>, StoreError> {
        let Some(raw) = self.get(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable snapshot");
                Ok(None)
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        self.set(SNAPSHOT_KEY, &json)
    }
}
