//! Encrypted backup export/import.
//!
//! A backup is the whole log in one file: the settings singleton plus
//! every event, JSON-serialized, then passed through the backup cipher
//! (see [`crate::crypto::cipher`] for the wire layout). Backups are the
//! migration path between devices; import is append-only on events and
//! last-writer-wins on settings.

use serde::Deserialize;

use crate::crypto::{decrypt_json, encrypt_json, validate_passphrase};
use crate::error::{AuraError, Result};
use crate::storage::{now_ms, Db, EventType, Settings};

/// Application tag embedded in every backup payload.
pub const APP_NAME: &str = "High Aura";

/// Backup payload schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// What an import applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Events appended (equals the backup's event count; no dedup)
    pub events_imported: usize,
}

/// An event as it appears inside a backup payload.
///
/// The source identifier is deliberately absent: import assigns fresh
/// identifiers, so imported events can never collide with local ones.
#[derive(Debug, Deserialize)]
struct ImportedEvent {
    ts: i64,
    #[serde(rename = "type")]
    kind: EventType,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Serialize and encrypt the full log.
///
/// Reads the current settings and every event, tags the payload with
/// the schema version and export timestamp, and encrypts it with the
/// passphrase-derived key.
///
/// # Errors
///
/// Returns `AuraError::Validation` for a too-short passphrase (checked
/// before any storage read or cryptographic work) and storage/crypto
/// failures unchanged.
pub fn export_backup(db: &Db, passphrase: &str) -> Result<Vec<u8>> {
    validate_passphrase(passphrase)?;

    let settings = db.settings().read()?;
    let events = db.events().all()?;

    let payload = serde_json::json!({
        "settings": settings,
        "events": events,
        "exportedAt": now_ms(),
        "app": APP_NAME,
        "version": SCHEMA_VERSION,
    });

    encrypt_json(passphrase, &payload)
}

/// Decrypt and apply a backup.
///
/// Validation happens before any mutation: the decrypted payload must
/// carry a `settings` object and an `events` array, and every event
/// must parse. The settings replace and all event appends then commit
/// in a single transaction, so a crash mid-import cannot leave settings
/// from the backup with events missing, or vice versa.
///
/// Imported events get freshly assigned identifiers and are never
/// deduplicated: re-importing the same backup duplicates every event.
///
/// # Errors
///
/// - `AuraError::Validation`: passphrase shorter than the minimum
/// - `AuraError::Decryption`: wrong passphrase or tampered file
/// - `AuraError::MalformedBackup`: structurally invalid payload;
///   nothing has been written
pub fn import_backup(db: &Db, passphrase: &str, bytes: &[u8]) -> Result<ImportSummary> {
    validate_passphrase(passphrase)?;

    let payload = decrypt_json(passphrase, bytes)?;

    let settings_value = payload
        .get("settings")
        .filter(|value| value.is_object())
        .ok_or_else(|| AuraError::MalformedBackup("payload has no settings object".to_string()))?;
    let events_value = payload
        .get("events")
        .and_then(|value| value.as_array())
        .ok_or_else(|| AuraError::MalformedBackup("payload has no events array".to_string()))?;

    let settings: Settings = serde_json::from_value(settings_value.clone())
        .map_err(|e| AuraError::MalformedBackup(format!("invalid settings record: {}", e)))?;

    let mut events = Vec::with_capacity(events_value.len());
    for value in events_value {
        let event: ImportedEvent = serde_json::from_value(value.clone())
            .map_err(|e| AuraError::MalformedBackup(format!("invalid event: {}", e)))?;
        events.push((event.ts, event.kind, event.data));
    }

    let count = db.apply_snapshot(&settings, &events)?;
    Ok(ImportSummary {
        events_imported: count,
    })
}

/// Conventional backup filename for a local date: `high-aura-backup-YYYY-MM-DD.bin`.
pub fn backup_filename(date: chrono::NaiveDate) -> String {
    format!("high-aura-backup-{}.bin", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encrypt_json;
    use crate::storage::SettingsPatch;

    const PASS: &str = "backup-passphrase-123";

    fn seeded_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.settings()
            .write(&SettingsPatch {
                honor: Some(80),
                kcal: Some(2000),
                ..Default::default()
            })
            .unwrap();
        db.events().append(EventType::AppOpened, None).unwrap();
        db.events()
            .append(
                EventType::CriticalViolation,
                Some(serde_json::json!({"kind": "aposta", "penalty": 30})),
            )
            .unwrap();
        db
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = seeded_db();
        let bytes = export_backup(&source, PASS).unwrap();

        let target = Db::open_in_memory().unwrap();
        let summary = import_backup(&target, PASS, &bytes).unwrap();

        assert_eq!(summary.events_imported, 2);
        assert_eq!(target.events().count().unwrap(), 2);

        let settings = target.settings().read().unwrap();
        assert_eq!(settings.honor, 80);
        assert_eq!(settings.kcal, 2000);
    }

    #[test]
    fn test_reimport_duplicates_events() {
        let source = seeded_db();
        let bytes = export_backup(&source, PASS).unwrap();

        let target = Db::open_in_memory().unwrap();
        import_backup(&target, PASS, &bytes).unwrap();
        import_backup(&target, PASS, &bytes).unwrap();

        // Append-only, no dedup: same backup twice doubles the log.
        assert_eq!(target.events().count().unwrap(), 4);
    }

    #[test]
    fn test_import_assigns_fresh_ids() {
        let source = seeded_db();
        let bytes = export_backup(&source, PASS).unwrap();

        let target = Db::open_in_memory().unwrap();
        target.events().append(EventType::AppOpened, None).unwrap();
        import_backup(&target, PASS, &bytes).unwrap();

        let ids: Vec<i64> = target.events().all().unwrap().iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids.len(), sorted.len(), "ids must be unique");
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be increasing");
    }

    #[test]
    fn test_import_wrong_passphrase_fails_closed() {
        let source = seeded_db();
        let bytes = export_backup(&source, PASS).unwrap();

        let target = Db::open_in_memory().unwrap();
        let result = import_backup(&target, "other-passphrase-456", &bytes);

        assert!(matches!(result, Err(AuraError::Decryption)));
        assert_eq!(target.events().count().unwrap(), 0);
    }

    #[test]
    fn test_import_missing_events_aborts_with_zero_mutation() {
        let payload = serde_json::json!({
            "settings": Settings::default_record(0),
            "exportedAt": 0,
            "app": APP_NAME,
            "version": SCHEMA_VERSION,
        });
        let bytes = encrypt_json(PASS, &payload).unwrap();

        let target = Db::open_in_memory().unwrap();
        target
            .settings()
            .write(&SettingsPatch {
                honor: Some(55),
                ..Default::default()
            })
            .unwrap();

        let result = import_backup(&target, PASS, &bytes);
        assert!(matches!(result, Err(AuraError::MalformedBackup(_))));

        // Nothing changed: no events, settings untouched.
        assert_eq!(target.events().count().unwrap(), 0);
        assert_eq!(target.settings().read().unwrap().honor, 55);
    }

    #[test]
    fn test_import_missing_settings_aborts() {
        let payload = serde_json::json!({ "events": [] });
        let bytes = encrypt_json(PASS, &payload).unwrap();

        let target = Db::open_in_memory().unwrap();
        let result = import_backup(&target, PASS, &bytes);
        assert!(matches!(result, Err(AuraError::MalformedBackup(_))));
    }

    #[test]
    fn test_short_passphrase_rejected_before_crypto() {
        let db = Db::open_in_memory().unwrap();
        assert!(matches!(
            export_backup(&db, "short"),
            Err(AuraError::Validation(_))
        ));
        assert!(matches!(
            import_backup(&db, "short", &[]),
            Err(AuraError::Validation(_))
        ));
    }

    #[test]
    fn test_backup_filename_convention() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(backup_filename(date), "high-aura-backup-2025-03-07.bin");
    }
}
