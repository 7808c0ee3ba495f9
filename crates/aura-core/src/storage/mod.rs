//! SQLite-backed storage for events, settings, audio, and photos.
//!
//! One [`Db`] owns the connection; the store views ([`EventStore`],
//! [`SettingsStore`], [`AudioStore`], [`PhotoStore`]) borrow it and are
//! the only writers of their respective tables. All mutations run inside
//! single-connection transactions; the backup import is the one
//! operation whose transaction spans two stores.

mod events;
mod media;
mod settings;
mod types;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{AuraError, Result};

pub use events::EventStore;
pub use media::{AudioStore, PhotoStore};
pub use settings::SettingsStore;
pub use types::{
    AudioAsset, Event, EventType, Photo, PhotoKind, Settings, SettingsPatch, AUDIO_ID, SETTINGS_ID,
};

/// Current epoch-ms timestamp.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Handle to the local High Aura database.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Open (creating if necessary) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AuraError::Sqlite` if the file cannot be opened or the
    /// schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ts INTEGER NOT NULL,
                type TEXT NOT NULL,
                data_json TEXT
            );
            CREATE INDEX IF NOT EXISTS events_ts ON events (ts);

            CREATE TABLE IF NOT EXISTS settings (
                id TEXT PRIMARY KEY,
                record_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS audio (
                id TEXT PRIMARY KEY,
                mime TEXT NOT NULL,
                bytes BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ts INTEGER NOT NULL,
                kind TEXT NOT NULL,
                bytes BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS photos_kind_ts ON photos (kind, ts);
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is
    /// poisoned.
    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AuraError::Storage("SQLite connection poisoned".to_string()))
    }

    /// The append-only event log.
    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(self)
    }

    /// The settings singleton.
    pub fn settings(&self) -> SettingsStore<'_> {
        SettingsStore::new(self)
    }

    /// The uploaded audio singleton.
    pub fn audio(&self) -> AudioStore<'_> {
        AudioStore::new(self)
    }

    /// The progress-photo log.
    pub fn photos(&self) -> PhotoStore<'_> {
        PhotoStore::new(self)
    }

    /// Apply an imported backup snapshot in one transaction.
    ///
    /// Replaces the settings singleton and appends every event with a
    /// freshly assigned identifier. Either the whole snapshot becomes
    /// visible or none of it does; a failure mid-way rolls back both the
    /// settings replace and any events already inserted.
    pub(crate) fn apply_snapshot(
        &self,
        settings: &Settings,
        events: &[(i64, EventType, Option<serde_json::Value>)],
    ) -> Result<usize> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let record_json = serde_json::to_string(settings)?;
        tx.execute(
            r#"
            INSERT INTO settings (id, record_json) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET record_json = excluded.record_json
            "#,
            (SETTINGS_ID, record_json),
        )?;

        let mut inserted = 0usize;
        for (ts, kind, data) in events {
            let data_json = data.as_ref().map(serde_json::to_string).transpose()?;
            tx.execute(
                "INSERT INTO events (ts, type, data_json) VALUES (?, ?, ?)",
                (ts, kind.as_str(), data_json),
            )?;
            inserted += 1;
        }

        tx.commit()?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_schema_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aura.db");

        {
            let db = Db::open(&path).unwrap();
            db.events().append(EventType::AppOpened, None).unwrap();
        }

        // Re-opening must find the existing data, not recreate tables.
        let db = Db::open(&path).unwrap();
        assert_eq!(db.events().all().unwrap().len(), 1);
    }

    #[test]
    fn test_apply_snapshot_is_atomic_with_events() {
        let db = Db::open_in_memory().unwrap();
        let settings = Settings::default_record(1);

        let count = db
            .apply_snapshot(
                &settings,
                &[
                    (10, EventType::AppOpened, None),
                    (20, EventType::MoodLogged, Some(serde_json::json!({"energy": 3}))),
                ],
            )
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(db.events().all().unwrap().len(), 2);
        assert_eq!(db.settings().read().unwrap().day0, 1);
    }
}
