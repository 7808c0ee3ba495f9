//! `aura audio` and `aura photo` - binary asset commands.

use std::path::Path;
use std::str::FromStr;

use chrono::TimeZone;
use comfy_table::{presets, Table};
use serde_json::json;

use aura_core::storage::{EventType, PhotoKind, SettingsPatch};
use aura_core::Db;

pub fn audio_upload(db: &Db, file: &str, mime: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("Failed to read audio file {}: {}", file, e))?;
    let mime = mime
        .map(str::to_string)
        .unwrap_or_else(|| guess_audio_mime(file).to_string());

    let asset = db.audio().put(&mime, &bytes)?;
    if !quiet {
        println!("Audio replaced ({}, {} bytes).", asset.mime, asset.bytes.len());
    }
    Ok(())
}

pub fn audio_arm(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let settings = db.settings().read()?;
    if !settings.audio_enabled {
        anyhow::bail!("Audio is off. Turn it on first: aura audio toggle");
    }
    if db.audio().get()?.is_none() {
        anyhow::bail!("No audio has been uploaded. Upload one: aura audio upload <file>");
    }

    db.settings().write(&SettingsPatch {
        audio_armed: Some(true),
        ..Default::default()
    })?;
    if !quiet {
        println!("Audio armed: it will autoplay on next open.");
    }
    Ok(())
}

pub fn audio_toggle(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let settings = db.settings().read()?;
    let enabled = !settings.audio_enabled;

    db.settings().write(&SettingsPatch {
        audio_enabled: Some(enabled),
        ..Default::default()
    })?;
    if !quiet {
        println!("Audio is now {}.", if enabled { "on" } else { "off" });
    }
    Ok(())
}

pub fn photo_add(db: &Db, kind: &str, file: &str, quiet: bool) -> anyhow::Result<()> {
    let kind = PhotoKind::from_str(kind).map_err(|e| anyhow::anyhow!(e))?;
    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("Failed to read photo file {}: {}", file, e))?;

    let photo = db.photos().add(kind, &bytes)?;
    db.events()
        .append(EventType::PhotoAdded, Some(json!({"kind": kind.as_str()})))?;

    if !quiet {
        println!("Photo #{} added ({}, {} bytes).", photo.id, kind.as_str(), bytes.len());
    }
    Ok(())
}

pub fn photo_timeline(db: &Db, kind: &str, limit: usize) -> anyhow::Result<()> {
    let kind = PhotoKind::from_str(kind).map_err(|e| anyhow::anyhow!(e))?;
    let photos = db.photos().timeline(kind, limit)?;

    if photos.is_empty() {
        println!("No {} photos yet.", kind.as_str());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(["ID", "DATE", "SIZE"]);
    for photo in &photos {
        let date = chrono::Local
            .timestamp_millis_opt(photo.ts)
            .single()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| photo.ts.to_string());
        table.add_row([
            photo.id.to_string(),
            date,
            format!("{} bytes", photo.bytes.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn guess_audio_mime(file: &str) -> &'static str {
    match Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        // mp3 and anything unknown, same default as the original uploader
        _ => "audio/mpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_audio_mime() {
        assert_eq!(guess_audio_mime("song.mp3"), "audio/mpeg");
        assert_eq!(guess_audio_mime("song.OGG"), "audio/ogg");
        assert_eq!(guess_audio_mime("song.wav"), "audio/wav");
        assert_eq!(guess_audio_mime("noext"), "audio/mpeg");
    }
}
