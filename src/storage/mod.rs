//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - JSON blobs for players, settings, pack selection and the running game

use crate::config::{PackSelection, Settings};
use crate::game::engine::GameSnapshot;
use crate::game::roster::Roster;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and blobs tables
const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "lastword.db";

pub const KEY_PLAYERS: &str = "players";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_PACK: &str = "pack";
pub const KEY_SESSION: &str = "session";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// The storage handle for saved game data.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database in the OS data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/lastword/` or `~/.local/share/lastword/`
    /// - macOS: `~/Library/Application Support/lastword/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        Self::open_in(&data_dir)
    }

    /// Open or create the database inside `dir`.
    pub fn open_in(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(StorageError::CreateDirFailed)?;
        let conn = Connection::open(dir.join(DB_FILE))?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "lastword")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Store `value` as JSON under `key`, replacing what was there.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, now_ms()],
        )?;
        debug!(key, "saved");
        Ok(())
    }

    /// Read the value under `key`.
    ///
    /// A blob that no longer decodes is treated as missing.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable saved value");
                Ok(None)
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn save_players(&self, roster: &Roster) -> Result<(), StorageError> {
        self.put(KEY_PLAYERS, roster)
    }

    pub fn load_players(&self) -> Result<Option<Roster>, StorageError> {
        self.get(KEY_PLAYERS)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.put(KEY_SETTINGS, settings)
    }

    pub fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        self.get(KEY_SETTINGS)
    }

    pub fn save_pack(&self, selection: &PackSelection) -> Result<(), StorageError> {
        self.put(KEY_PACK, selection)
    }

    pub fn load_pack(&self) -> Result<Option<PackSelection>, StorageError> {
        self.get(KEY_PACK)
    }

    /// Save the game in progress so it survives a restart
    pub fn save_session(&self, snapshot: &GameSnapshot) -> Result<(), StorageError> {
        self.put(KEY_SESSION, snapshot)
    }

    pub fn load_session(&self) -> Result<Option<GameSnapshot>, StorageError> {
        self.get(KEY_SESSION)
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.remove(KEY_SESSION)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- One JSON document per key
            CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_ms()],
        )?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
