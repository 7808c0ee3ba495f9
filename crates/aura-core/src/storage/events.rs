//! Append-only event log.
//!
//! The store exclusively owns event identity assignment. No update or
//! delete operations exist: once appended, an event can never be
//! silently rewritten, which is the basis for audit integrity.

use std::str::FromStr;

use rusqlite::Row;

use crate::error::{AuraError, Result};
use crate::storage::types::{Event, EventType};
use crate::storage::{now_ms, Db};

/// View over the `events` table.
pub struct EventStore<'a> {
    db: &'a Db,
}

impl<'a> EventStore<'a> {
    pub(crate) fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Append a new event, assigning the next identifier and the current
    /// timestamp. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `AuraError::Sqlite`/`AuraError::Storage` on persistence
    /// failure; fatal to the caller, never retried internally.
    pub fn append(&self, kind: EventType, data: Option<serde_json::Value>) -> Result<Event> {
        let ts = now_ms();
        let data_json = data.as_ref().map(serde_json::to_string).transpose()?;

        let conn = self.db.lock_conn()?;
        conn.execute(
            "INSERT INTO events (ts, type, data_json) VALUES (?, ?, ?)",
            (ts, kind.as_str(), data_json),
        )?;
        let id = conn.last_insert_rowid();

        Ok(Event { id, ts, kind, data })
    }

    /// Events with `ts >= since_ts`, ascending by timestamp.
    pub fn since(&self, since_ts: i64) -> Result<Vec<Event>> {
        let conn = self.db.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, ts, type, data_json FROM events WHERE ts >= ? ORDER BY ts ASC, id ASC",
        )?;
        let rows = stmt.query_map([since_ts], row_to_parts)?;
        collect_events(rows)
    }

    /// The full log in insertion order.
    pub fn all(&self) -> Result<Vec<Event>> {
        let conn = self.db.lock_conn()?;
        let mut stmt = conn.prepare("SELECT id, ts, type, data_json FROM events ORDER BY id ASC")?;
        let rows = stmt.query_map([], row_to_parts)?;
        collect_events(rows)
    }

    /// Number of events in the log.
    pub fn count(&self) -> Result<i64> {
        let conn = self.db.lock_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }
}

type EventParts = (i64, i64, String, Option<String>);

fn row_to_parts(row: &Row<'_>) -> rusqlite::Result<EventParts> {
    Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, i64>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, Option<String>>(3)?,
    ))
}

fn collect_events(
    rows: impl Iterator<Item = rusqlite::Result<EventParts>>,
) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for row in rows {
        let (id, ts, kind, data_json) = row?;
        let kind = EventType::from_str(&kind).map_err(AuraError::Storage)?;
        let data = data_json
            .map(|raw| serde_json::from_str(&raw))
            .transpose()?;
        events.push(Event { id, ts, kind, data });
    }
    Ok(events)
}
