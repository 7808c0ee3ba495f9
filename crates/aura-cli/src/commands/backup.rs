//! `aura export` and `aura import` - encrypted whole-log backup.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use aura_core::backup::{backup_filename, export_backup, import_backup};
use aura_core::crypto::validate_passphrase;
use aura_core::session::Session;
use aura_core::Db;

use crate::app::{ensure_admin, prompt_passphrase};

pub fn export(db: &Db, out: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let session = Session::attach(db)?;
    ensure_admin(&session)?;

    let passphrase = prompt_passphrase(true)?;
    validate_passphrase(&passphrase)?;

    let bytes = export_backup(db, &passphrase)?;

    let destination = match out {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(backup_filename(chrono::Local::now().date_naive())),
    };
    write_atomic(&destination, &bytes)?;

    if !quiet {
        println!(
            "Exported {} bytes to {}",
            bytes.len(),
            destination.display()
        );
    }
    Ok(())
}

pub fn import(db: &Db, file: &str, quiet: bool) -> anyhow::Result<()> {
    let session = Session::attach(db)?;
    ensure_admin(&session)?;

    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("Failed to read backup file {}: {}", file, e))?;

    let passphrase = prompt_passphrase(false)?;
    validate_passphrase(&passphrase)?;

    let summary = import_backup(db, &passphrase, &bytes)?;

    if !quiet {
        println!(
            "Imported {} events; settings replaced from the backup.",
            summary.events_imported
        );
    }
    Ok(())
}

fn write_atomic(destination: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create backup directory {}: {}",
            parent.display(),
            e
        )
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let temp_path = parent.join(format!(".aura-backup-{}.tmp", nanos));

    let mut file = std::fs::File::create(&temp_path)
        .map_err(|e| anyhow::anyhow!("Temp file create failed: {}", e))?;
    file.write_all(data)
        .map_err(|e| anyhow::anyhow!("Temp file write failed: {}", e))?;
    file.sync_all()
        .map_err(|e| anyhow::anyhow!("Temp file sync failed: {}", e))?;
    drop(file);

    if let Err(err) = std::fs::rename(&temp_path, destination) {
        let _ = std::fs::remove_file(destination);
        std::fs::rename(&temp_path, destination).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            anyhow::anyhow!("Atomic rename failed ({}): {}", err, e)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("backup.bin");

        write_atomic(&dest, b"first").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"first");

        write_atomic(&dest, b"second").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"second");

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
