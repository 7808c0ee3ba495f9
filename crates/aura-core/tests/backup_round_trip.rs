//! End-to-end backup flow against real database files.

use tempfile::tempdir;

use aura_core::backup::{export_backup, import_backup};
use aura_core::session::Session;
use aura_core::storage::{EventType, SettingsPatch};
use aura_core::{AuraError, Db};

const PASS: &str = "migration-passphrase-123";

#[test]
fn test_backup_migrates_between_database_files() {
    let dir = tempdir().expect("tempdir should be available");
    let source_path = dir.path().join("old-device.db");
    let target_path = dir.path().join("new-device.db");

    // Build up some history on the source device.
    let source = Db::open(&source_path).expect("open should succeed");
    let mut session = Session::attach(&source).expect("attach should succeed");
    session.set_pin("4321").expect("set_pin should succeed");
    session.enable_strict().expect("enable_strict should succeed");
    session
        .record_critical_violation("aposta")
        .expect("violation should succeed");
    source
        .settings()
        .write(&SettingsPatch {
            kcal: Some(2100),
            ..Default::default()
        })
        .expect("settings write should succeed");

    let bytes = export_backup(&source, PASS).expect("export should succeed");
    let source_events = source.events().count().expect("count should succeed");

    // Import on a fresh device.
    let target = Db::open(&target_path).expect("open should succeed");
    let summary = import_backup(&target, PASS, &bytes).expect("import should succeed");

    assert_eq!(summary.events_imported as i64, source_events);
    assert_eq!(
        target.events().count().expect("count should succeed"),
        source_events
    );

    let settings = target.settings().read().expect("read should succeed");
    assert_eq!(settings.kcal, 2100);
    assert_eq!(settings.honor, 70);
    assert!(settings.strict_mode);

    // The imported device resumes in strict mode and honors the same PIN.
    let mut session = Session::attach(&target).expect("attach should succeed");
    assert_eq!(session.mode(), aura_core::Mode::Strict);
    let outcome = session.try_exit_strict("4321").expect("exit should succeed");
    assert_eq!(outcome, aura_core::ExitStrictOutcome::Exited);
}

#[test]
fn test_reimport_doubles_the_event_log() {
    let dir = tempdir().expect("tempdir should be available");
    let path = dir.path().join("aura.db");

    let db = Db::open(&path).expect("open should succeed");
    db.events()
        .append(EventType::AppOpened, None)
        .expect("append should succeed");

    let bytes = export_backup(&db, PASS).expect("export should succeed");

    import_backup(&db, PASS, &bytes).expect("first import should succeed");
    import_backup(&db, PASS, &bytes).expect("second import should succeed");

    // 1 original + 1 + 1 imported copies, no dedup.
    assert_eq!(db.events().count().expect("count should succeed"), 3);
}

#[test]
fn test_truncated_backup_file_fails_closed() {
    let dir = tempdir().expect("tempdir should be available");
    let path = dir.path().join("aura.db");

    let db = Db::open(&path).expect("open should succeed");
    let bytes = export_backup(&db, PASS).expect("export should succeed");

    let truncated = &bytes[..bytes.len() / 2];
    let result = import_backup(&db, PASS, truncated);
    assert!(matches!(result, Err(AuraError::Decryption)));
}
