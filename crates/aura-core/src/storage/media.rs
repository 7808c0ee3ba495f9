//! Binary asset stores: the audio singleton and the progress-photo log.

use rusqlite::OptionalExtension;

use crate::error::Result;
use crate::storage::types::{AudioAsset, Photo, PhotoKind, AUDIO_ID};
use crate::storage::{now_ms, Db};

/// View over the `audio` table (singleton, replaced wholesale on upload).
pub struct AudioStore<'a> {
    db: &'a Db,
}

impl<'a> AudioStore<'a> {
    pub(crate) fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Replace the audio asset.
    pub fn put(&self, mime: &str, bytes: &[u8]) -> Result<AudioAsset> {
        let updated_at = now_ms();
        let conn = self.db.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO audio (id, mime, bytes, updated_at) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                mime = excluded.mime,
                bytes = excluded.bytes,
                updated_at = excluded.updated_at
            "#,
            (AUDIO_ID, mime, bytes, updated_at),
        )?;

        Ok(AudioAsset {
            id: AUDIO_ID.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
            updated_at,
        })
    }

    /// The current audio asset, if one was ever uploaded.
    pub fn get(&self) -> Result<Option<AudioAsset>> {
        let conn = self.db.lock_conn()?;
        let asset = conn
            .query_row(
                "SELECT id, mime, bytes, updated_at FROM audio WHERE id = ?",
                [AUDIO_ID],
                |row| {
                    Ok(AudioAsset {
                        id: row.get(0)?,
                        mime: row.get(1)?,
                        bytes: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(asset)
    }
}

/// View over the `photos` table (append-only).
pub struct PhotoStore<'a> {
    db: &'a Db,
}

impl<'a> PhotoStore<'a> {
    pub(crate) fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Append a photo, stamping the current timestamp.
    pub fn add(&self, kind: PhotoKind, bytes: &[u8]) -> Result<Photo> {
        let ts = now_ms();
        let conn = self.db.lock_conn()?;
        conn.execute(
            "INSERT INTO photos (ts, kind, bytes) VALUES (?, ?, ?)",
            (ts, kind.as_str(), bytes),
        )?;
        let id = conn.last_insert_rowid();

        Ok(Photo {
            id,
            ts,
            kind,
            bytes: bytes.to_vec(),
        })
    }

    /// The most recent photo for `kind`, if any.
    pub fn latest(&self, kind: PhotoKind) -> Result<Option<Photo>> {
        let conn = self.db.lock_conn()?;
        let photo = conn
            .query_row(
                "SELECT id, ts, bytes FROM photos WHERE kind = ? ORDER BY ts DESC, id DESC LIMIT 1",
                [kind.as_str()],
                |row| {
                    Ok(Photo {
                        id: row.get(0)?,
                        ts: row.get(1)?,
                        kind,
                        bytes: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(photo)
    }

    /// Up to `limit` photos for `kind`, newest first.
    pub fn timeline(&self, kind: PhotoKind, limit: usize) -> Result<Vec<Photo>> {
        let conn = self.db.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, ts, bytes FROM photos WHERE kind = ? ORDER BY ts DESC, id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map((kind.as_str(), limit as i64), |row| {
            Ok(Photo {
                id: row.get(0)?,
                ts: row.get(1)?,
                kind,
                bytes: row.get(2)?,
            })
        })?;

        let mut photos = Vec::new();
        for row in rows {
            photos.push(row?);
        }
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_replaced_wholesale() {
        let db = Db::open_in_memory().unwrap();
        assert!(db.audio().get().unwrap().is_none());

        db.audio().put("audio/mpeg", b"first").unwrap();
        db.audio().put("audio/ogg", b"second").unwrap();

        let asset = db.audio().get().unwrap().unwrap();
        assert_eq!(asset.mime, "audio/ogg");
        assert_eq!(asset.bytes, b"second");

        let conn = db.lock_conn().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audio", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_photo_latest_and_timeline() {
        let db = Db::open_in_memory().unwrap();
        let photos = db.photos();

        let a = photos.add(PhotoKind::Front, b"a").unwrap();
        let b = photos.add(PhotoKind::Front, b"b").unwrap();
        photos.add(PhotoKind::Side, b"s").unwrap();

        let latest = photos.latest(PhotoKind::Front).unwrap().unwrap();
        assert_eq!(latest.id, b.id);

        let timeline = photos.timeline(PhotoKind::Front, 12).unwrap();
        assert_eq!(timeline.len(), 2);
        // Newest first
        assert_eq!(timeline[0].id, b.id);
        assert_eq!(timeline[1].id, a.id);

        assert!(photos.latest(PhotoKind::Back).unwrap().is_none());
    }
}
