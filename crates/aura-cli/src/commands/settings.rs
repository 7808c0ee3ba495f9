//! `aura settings` - show and change the settings record.

use aura_core::session::Session;
use aura_core::storage::SettingsPatch;
use aura_core::time::{hhmm_to_ms, ms_to_hhmm};
use aura_core::Db;

use crate::app::ensure_admin;

pub fn show(db: &Db) -> anyhow::Result<()> {
    let s = db.settings().read()?;

    println!("Anchors");
    println!("  wake   {}", ms_to_hhmm(s.wake_ms));
    println!("  lunch  {}", ms_to_hhmm(s.lunch_ms));
    println!("  sleep  {}", ms_to_hhmm(s.sleep_ms));
    println!("Targets");
    println!("  study  {} min/day", s.daily_study_min);
    println!("  prayer {} min/day", s.daily_prayer_min);
    println!("  social {} /week", s.weekly_social_min);
    println!("Diet");
    println!(
        "  {} kcal • P {} g • C {} g • F {} g",
        s.kcal, s.protein_g, s.carbs_g, s.fat_g
    );
    println!("Body");
    println!("  {} kg -> {} kg", s.start_weight_kg, s.target_weight_kg);
    println!("Discipline");
    println!("  honor {}/100, penalty {} per critical violation", s.honor, s.critical_penalty);
    println!(
        "  strict mode {}, PIN {}",
        if s.strict_mode { "on" } else { "off" },
        if s.strict_pin_hash.is_empty() { "unset" } else { "set" }
    );
    Ok(())
}

pub fn set(db: &Db, field: &str, value: &str, quiet: bool) -> anyhow::Result<()> {
    let session = Session::attach(db)?;
    ensure_admin(&session)?;

    let patch = patch_for(field, value)?;
    db.settings().write(&patch)?;

    if !quiet {
        println!("Set {} = {}", field, value);
    }
    Ok(())
}

fn patch_for(field: &str, value: &str) -> anyhow::Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();
    match field {
        "wake" => patch.wake_ms = Some(parse_hhmm(value)?),
        "lunch" => patch.lunch_ms = Some(parse_hhmm(value)?),
        "sleep" => patch.sleep_ms = Some(parse_hhmm(value)?),
        "kcal" => patch.kcal = Some(parse_number(field, value)?),
        "protein" => patch.protein_g = Some(parse_number(field, value)?),
        "fat" => patch.fat_g = Some(parse_number(field, value)?),
        "carbs" => patch.carbs_g = Some(parse_number(field, value)?),
        other => anyhow::bail!(
            "Unknown field \"{}\". Fields: wake, lunch, sleep, kcal, protein, fat, carbs",
            other
        ),
    }
    Ok(patch)
}

fn parse_hhmm(value: &str) -> anyhow::Result<i64> {
    hhmm_to_ms(value).map_err(|e| anyhow::anyhow!(e))
}

fn parse_number(field: &str, value: &str) -> anyhow::Result<i64> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("{} expects a whole number, got \"{}\"", field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_for_anchor_fields() {
        let patch = patch_for("wake", "05:30").unwrap();
        assert_eq!(patch.wake_ms, Some(5 * 60 * 60 * 1000 + 30 * 60 * 1000));
        assert!(patch.kcal.is_none());
    }

    #[test]
    fn test_patch_for_diet_fields() {
        let patch = patch_for("kcal", "2100").unwrap();
        assert_eq!(patch.kcal, Some(2100));
    }

    #[test]
    fn test_patch_for_rejects_unknown_and_garbage() {
        assert!(patch_for("honor", "50").is_err());
        assert!(patch_for("kcal", "lots").is_err());
        assert!(patch_for("wake", "sunrise").is_err());
    }
}
