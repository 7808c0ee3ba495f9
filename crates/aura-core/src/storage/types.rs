//! Core data types for the storage layer.
//!
//! Wire names are camelCase to stay compatible with backups produced by
//! earlier versions of the app; the Rust side uses the usual snake_case.

use serde::{Deserialize, Serialize};

/// Fixed key of the settings singleton.
pub const SETTINGS_ID: &str = "singleton";

/// Fixed key of the audio asset singleton.
pub const AUDIO_ID: &str = "main";

/// Domain event tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AppOpened,
    BlockStarted,
    TimerCompleted,
    TaskToggled,
    BlockCompleted,
    BlockFailed,
    CriticalViolation,
    MoodLogged,
    SleepLogged,
    WeightLogged,
    PhotoAdded,
    InterruptCycle,
    Pur90Started,
    StrictModeChanged,
    ContractSigned,
    ContractRenewed,
    AuditSubmitted,
    SocialLogged,
}

impl EventType {
    /// The wire/database tag for this event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AppOpened => "app_opened",
            EventType::BlockStarted => "block_started",
            EventType::TimerCompleted => "timer_completed",
            EventType::TaskToggled => "task_toggled",
            EventType::BlockCompleted => "block_completed",
            EventType::BlockFailed => "block_failed",
            EventType::CriticalViolation => "critical_violation",
            EventType::MoodLogged => "mood_logged",
            EventType::SleepLogged => "sleep_logged",
            EventType::WeightLogged => "weight_logged",
            EventType::PhotoAdded => "photo_added",
            EventType::InterruptCycle => "interrupt_cycle",
            EventType::Pur90Started => "pur90_started",
            EventType::StrictModeChanged => "strict_mode_changed",
            EventType::ContractSigned => "contract_signed",
            EventType::ContractRenewed => "contract_renewed",
            EventType::AuditSubmitted => "audit_submitted",
            EventType::SocialLogged => "social_logged",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "app_opened" => Ok(EventType::AppOpened),
            "block_started" => Ok(EventType::BlockStarted),
            "timer_completed" => Ok(EventType::TimerCompleted),
            "task_toggled" => Ok(EventType::TaskToggled),
            "block_completed" => Ok(EventType::BlockCompleted),
            "block_failed" => Ok(EventType::BlockFailed),
            "critical_violation" => Ok(EventType::CriticalViolation),
            "mood_logged" => Ok(EventType::MoodLogged),
            "sleep_logged" => Ok(EventType::SleepLogged),
            "weight_logged" => Ok(EventType::WeightLogged),
            "photo_added" => Ok(EventType::PhotoAdded),
            "interrupt_cycle" => Ok(EventType::InterruptCycle),
            "pur90_started" => Ok(EventType::Pur90Started),
            "strict_mode_changed" => Ok(EventType::StrictModeChanged),
            "contract_signed" => Ok(EventType::ContractSigned),
            "contract_renewed" => Ok(EventType::ContractRenewed),
            "audit_submitted" => Ok(EventType::AuditSubmitted),
            "social_logged" => Ok(EventType::SocialLogged),
            other => Err(format!("Unknown event type: {}", other)),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable domain event.
///
/// Identifiers are assigned by the Event Store in insertion order and
/// never reused. Events are never updated or deleted by normal
/// operation; the log is the durable source of truth for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned monotonic identifier
    pub id: i64,

    /// Event timestamp, epoch-ms
    pub ts: i64,

    /// Event type tag
    #[serde(rename = "type")]
    pub kind: EventType,

    /// Opaque structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The settings/state singleton.
///
/// Exactly one record exists at any time; reads that find none
/// materialize [`Settings::default_record`] first. Mutation is always a
/// full-record replace: the current record with a patch merged over it
/// via [`SettingsPatch::apply_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Fixed identifier, always `"singleton"`
    pub id: String,

    /// Wake anchor, ms from midnight
    pub wake_ms: i64,
    /// Lunch anchor, ms from midnight
    pub lunch_ms: i64,
    /// Sleep anchor, ms from midnight
    pub sleep_ms: i64,

    /// Daily study target, minutes
    pub daily_study_min: i64,
    /// Daily prayer target, minutes
    pub daily_prayer_min: i64,

    /// Honor score, clamped to 0..=100
    pub honor: i64,
    /// Whether the session starts in strict mode
    pub strict_mode: bool,
    /// SHA-256 hex digest of the strict-mode PIN; empty string = unset
    pub strict_pin_hash: String,

    /// Crisis containment window, hours
    pub crisis_containment_hours: i64,
    /// Honor penalty per critical violation
    pub critical_penalty: i64,

    pub audio_enabled: bool,
    pub audio_armed: bool,

    /// When the contract was signed, epoch-ms; absent until first signing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_signed_at: Option<i64>,
    pub contract_name: String,
    pub contract_version: i64,
    /// Contract freshness window, days
    pub contract_renew_every_days: i64,

    /// Weekly social interaction target
    pub weekly_social_min: i64,
    pub track_women_separate: bool,

    pub npc_style: String,
    pub theme: String,

    /// First-run timestamp, epoch-ms
    pub day0: i64,

    pub start_weight_kg: f64,
    pub target_weight_kg: f64,

    /// Diet macro targets
    pub kcal: i64,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
}

impl Settings {
    /// The documented default record, materialized on first read.
    ///
    /// `now_ms` becomes `day0`; every other field is a fixed default.
    pub fn default_record(now_ms: i64) -> Self {
        Self {
            id: SETTINGS_ID.to_string(),
            wake_ms: 4 * 60 * 60 * 1000,
            lunch_ms: 13 * 60 * 60 * 1000 + 30 * 60 * 1000,
            sleep_ms: 21 * 60 * 60 * 1000,

            daily_study_min: 60,
            daily_prayer_min: 10,

            honor: 100,
            strict_mode: false,
            strict_pin_hash: String::new(),

            crisis_containment_hours: 48,
            critical_penalty: 30,

            audio_enabled: true,
            audio_armed: false,

            contract_signed_at: None,
            contract_name: "Flaviano".to_string(),
            contract_version: 1,
            contract_renew_every_days: 90,

            weekly_social_min: 2,
            track_women_separate: true,

            npc_style: "mentor".to_string(),
            theme: "forge".to_string(),

            day0: now_ms,

            start_weight_kg: 86.0,
            target_weight_kg: 78.0,

            kcal: 2300,
            protein_g: 190,
            fat_g: 70,
            carbs_g: 210,
        }
    }

    /// Whether the contract is currently valid: signed, and signed less
    /// than `contract_renew_every_days` days before `now_ms`.
    pub fn contract_ok(&self, now_ms: i64) -> bool {
        match self.contract_signed_at {
            Some(signed_at) => {
                crate::time::days_between(signed_at, now_ms) < self.contract_renew_every_days
            }
            None => false,
        }
    }
}

/// A partial settings update.
///
/// Every field is optional; [`SettingsPatch::apply_to`] overwrites only
/// the fields that are present, leaving the rest of the record intact.
/// The singleton `id` is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub wake_ms: Option<i64>,
    pub lunch_ms: Option<i64>,
    pub sleep_ms: Option<i64>,
    pub daily_study_min: Option<i64>,
    pub daily_prayer_min: Option<i64>,
    pub honor: Option<i64>,
    pub strict_mode: Option<bool>,
    pub strict_pin_hash: Option<String>,
    pub crisis_containment_hours: Option<i64>,
    pub critical_penalty: Option<i64>,
    pub audio_enabled: Option<bool>,
    pub audio_armed: Option<bool>,
    pub contract_signed_at: Option<i64>,
    pub contract_name: Option<String>,
    pub contract_version: Option<i64>,
    pub contract_renew_every_days: Option<i64>,
    pub weekly_social_min: Option<i64>,
    pub track_women_separate: Option<bool>,
    pub npc_style: Option<String>,
    pub theme: Option<String>,
    pub day0: Option<i64>,
    pub start_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub kcal: Option<i64>,
    pub protein_g: Option<i64>,
    pub fat_g: Option<i64>,
    pub carbs_g: Option<i64>,
}

impl SettingsPatch {
    /// Shallow-merge this patch over `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = self.wake_ms {
            settings.wake_ms = v;
        }
        if let Some(v) = self.lunch_ms {
            settings.lunch_ms = v;
        }
        if let Some(v) = self.sleep_ms {
            settings.sleep_ms = v;
        }
        if let Some(v) = self.daily_study_min {
            settings.daily_study_min = v;
        }
        if let Some(v) = self.daily_prayer_min {
            settings.daily_prayer_min = v;
        }
        if let Some(v) = self.honor {
            settings.honor = v;
        }
        if let Some(v) = self.strict_mode {
            settings.strict_mode = v;
        }
        if let Some(ref v) = self.strict_pin_hash {
            settings.strict_pin_hash = v.clone();
        }
        if let Some(v) = self.crisis_containment_hours {
            settings.crisis_containment_hours = v;
        }
        if let Some(v) = self.critical_penalty {
            settings.critical_penalty = v;
        }
        if let Some(v) = self.audio_enabled {
            settings.audio_enabled = v;
        }
        if let Some(v) = self.audio_armed {
            settings.audio_armed = v;
        }
        if let Some(v) = self.contract_signed_at {
            settings.contract_signed_at = Some(v);
        }
        if let Some(ref v) = self.contract_name {
            settings.contract_name = v.clone();
        }
        if let Some(v) = self.contract_version {
            settings.contract_version = v;
        }
        if let Some(v) = self.contract_renew_every_days {
            settings.contract_renew_every_days = v;
        }
        if let Some(v) = self.weekly_social_min {
            settings.weekly_social_min = v;
        }
        if let Some(v) = self.track_women_separate {
            settings.track_women_separate = v;
        }
        if let Some(ref v) = self.npc_style {
            settings.npc_style = v.clone();
        }
        if let Some(ref v) = self.theme {
            settings.theme = v.clone();
        }
        if let Some(v) = self.day0 {
            settings.day0 = v;
        }
        if let Some(v) = self.start_weight_kg {
            settings.start_weight_kg = v;
        }
        if let Some(v) = self.target_weight_kg {
            settings.target_weight_kg = v;
        }
        if let Some(v) = self.kcal {
            settings.kcal = v;
        }
        if let Some(v) = self.protein_g {
            settings.protein_g = v;
        }
        if let Some(v) = self.fat_g {
            settings.fat_g = v;
        }
        if let Some(v) = self.carbs_g {
            settings.carbs_g = v;
        }
    }
}

/// The uploaded background-audio singleton, replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    /// Fixed identifier, always `"main"`
    pub id: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Last upload timestamp, epoch-ms
    pub updated_at: i64,
}

/// Progress-photo angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Front,
    Side,
    Back,
}

impl PhotoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Front => "front",
            PhotoKind::Side => "side",
            PhotoKind::Back => "back",
        }
    }
}

impl std::str::FromStr for PhotoKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "front" => Ok(PhotoKind::Front),
            "side" => Ok(PhotoKind::Side),
            "back" => Ok(PhotoKind::Back),
            other => Err(format!("Unknown photo kind: {}", other)),
        }
    }
}

/// An append-only progress photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub ts: i64,
    pub kind: PhotoKind,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trips_through_tag() {
        let all = [
            EventType::AppOpened,
            EventType::BlockStarted,
            EventType::TimerCompleted,
            EventType::TaskToggled,
            EventType::BlockCompleted,
            EventType::BlockFailed,
            EventType::CriticalViolation,
            EventType::MoodLogged,
            EventType::SleepLogged,
            EventType::WeightLogged,
            EventType::PhotoAdded,
            EventType::InterruptCycle,
            EventType::Pur90Started,
            EventType::StrictModeChanged,
            EventType::ContractSigned,
            EventType::ContractRenewed,
            EventType::AuditSubmitted,
            EventType::SocialLogged,
        ];
        for kind in all {
            let parsed: EventType = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("not_a_type".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_serde_wire_names() {
        let event = Event {
            id: 7,
            ts: 1000,
            kind: EventType::StrictModeChanged,
            data: Some(serde_json::json!({"enabled": true})),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "strict_mode_changed");
        assert_eq!(value["ts"], 1000);
        assert_eq!(value["data"]["enabled"], true);
    }

    #[test]
    fn test_default_record_values() {
        let s = Settings::default_record(123);
        assert_eq!(s.id, SETTINGS_ID);
        assert_eq!(s.wake_ms, 4 * 60 * 60 * 1000);
        assert_eq!(s.lunch_ms, 13 * 60 * 60 * 1000 + 30 * 60 * 1000);
        assert_eq!(s.sleep_ms, 21 * 60 * 60 * 1000);
        assert_eq!(s.honor, 100);
        assert!(!s.strict_mode);
        assert!(s.strict_pin_hash.is_empty());
        assert_eq!(s.critical_penalty, 30);
        assert!(s.audio_enabled);
        assert!(!s.audio_armed);
        assert_eq!(s.contract_signed_at, None);
        assert_eq!(s.contract_renew_every_days, 90);
        assert_eq!(s.day0, 123);
        assert_eq!(s.kcal, 2300);
        assert_eq!(s.protein_g, 190);
        assert_eq!(s.fat_g, 70);
        assert_eq!(s.carbs_g, 210);
    }

    #[test]
    fn test_settings_wire_names_are_camel_case() {
        let value = serde_json::to_value(Settings::default_record(0)).unwrap();
        assert!(value.get("wakeMs").is_some());
        assert!(value.get("strictPinHash").is_some());
        assert!(value.get("contractRenewEveryDays").is_some());
        assert!(value.get("proteinG").is_some());
        // unset contract date is omitted, matching the original record
        assert!(value.get("contractSignedAt").is_none());
    }

    #[test]
    fn test_patch_overwrites_only_present_fields() {
        let mut s = Settings::default_record(0);
        let patch = SettingsPatch {
            honor: Some(50),
            strict_mode: Some(true),
            ..Default::default()
        };
        patch.apply_to(&mut s);

        assert_eq!(s.honor, 50);
        assert!(s.strict_mode);
        // unrelated fields untouched
        assert_eq!(s.kcal, 2300);
        assert_eq!(s.contract_name, "Flaviano");
    }

    #[test]
    fn test_contract_ok_window() {
        let day = 24 * 60 * 60 * 1000;
        let mut s = Settings::default_record(0);

        assert!(!s.contract_ok(0));

        s.contract_signed_at = Some(0);
        assert!(s.contract_ok(0));
        assert!(s.contract_ok(89 * day));
        assert!(!s.contract_ok(90 * day));
        assert!(!s.contract_ok(91 * day));
    }
}
