//! `aura event` and `aura mood` - append to and inspect the log.

use std::str::FromStr;

use chrono::TimeZone;
use comfy_table::{presets, Table};
use serde_json::json;

use aura_core::storage::EventType;
use aura_core::Db;

pub fn add(db: &Db, event_type: &str, data: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let kind = EventType::from_str(event_type).map_err(|e| anyhow::anyhow!(e))?;
    let data = data
        .map(|raw| {
            serde_json::from_str::<serde_json::Value>(raw)
                .map_err(|e| anyhow::anyhow!("--data is not valid JSON: {}", e))
        })
        .transpose()?;

    let event = db.events().append(kind, data)?;
    if !quiet {
        println!("Logged {} as #{}", event.kind, event.id);
    }
    Ok(())
}

pub fn list(db: &Db, since: Option<&str>, json_output: bool) -> anyhow::Result<()> {
    let events = match since {
        Some(raw) => db.events().since(parse_since(raw)?)?,
        None => db.events().all()?,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(["ID", "TIME", "TYPE", "DATA"]);
    for event in &events {
        let time = chrono::Local
            .timestamp_millis_opt(event.ts)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| event.ts.to_string());
        let data = event
            .data
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        table.add_row([event.id.to_string(), time, event.kind.to_string(), data]);
    }
    println!("{table}");
    Ok(())
}

pub fn mood(
    db: &Db,
    energy: u8,
    stress: u8,
    focus: u8,
    libido: u8,
    quiet: bool,
) -> anyhow::Result<()> {
    for (name, value) in [
        ("energy", energy),
        ("stress", stress),
        ("focus", focus),
        ("libido", libido),
    ] {
        if !(1..=5).contains(&value) {
            anyhow::bail!("{} must be between 1 and 5 (got {})", name, value);
        }
    }

    db.events().append(
        EventType::MoodLogged,
        Some(json!({
            "energy": energy,
            "stress": stress,
            "focus": focus,
            "libido": libido,
        })),
    )?;

    // High stress auto-starts a containment cycle, same as the app.
    if stress >= 4 {
        db.events()
            .append(EventType::Pur90Started, Some(json!({"auto": true})))?;
        if !quiet {
            println!("Mood logged. Stress is high: PUR-90 started.");
        }
    } else if !quiet {
        println!("Mood logged.");
    }
    Ok(())
}

/// Accept an RFC 3339 timestamp or a bare local date.
fn parse_since(value: &str) -> anyhow::Result<i64> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date: {}", value))?;
        let local = chrono::Local
            .from_local_datetime(&midnight)
            .earliest()
            .ok_or_else(|| anyhow::anyhow!("Ambiguous local date: {}", value))?;
        return Ok(local.timestamp_millis());
    }
    anyhow::bail!(
        "Cannot parse \"{}\": expected RFC 3339 or YYYY-MM-DD",
        value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_since_rfc3339() {
        let ms = parse_since("2025-03-07T12:00:00Z").unwrap();
        assert_eq!(ms, 1_741_348_800_000);
    }

    #[test]
    fn test_parse_since_bare_date() {
        assert!(parse_since("2025-03-07").is_ok());
        assert!(parse_since("yesterday").is_err());
    }
}
