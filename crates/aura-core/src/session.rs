//! Strict/admin mode state machine.
//!
//! A [`Session`] is the in-memory mode machine bound to an open
//! database. It is the only component that toggles `strict_mode`,
//! manages the PIN digest, and applies honor penalties; it reads and
//! writes the Settings Store and appends to the Event Store, and never
//! touches the backup cipher.
//!
//! PIN attempts are not rate-limited. The original behavior has no
//! lockout or backoff, and none is invented here; all recovery is
//! user-initiated re-submission.

use serde_json::json;

use crate::crypto::{digest_matches, sha256_hex};
use crate::error::{AuraError, Result};
use crate::storage::{now_ms, Db, EventType, SettingsPatch};

/// Access-control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Restricted state; exits only via correct PIN
    Strict,
    /// Unrestricted configuration state
    Admin,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Strict => f.write_str("strict"),
            Mode::Admin => f.write_str("admin"),
        }
    }
}

/// Outcome of a strict-mode exit attempt.
///
/// These are ordinary results the caller re-prompts on, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStrictOutcome {
    /// PIN verified; the session is now in admin mode
    Exited,
    /// No PIN has ever been set; exit refused with a distinct message
    NoPinSet,
    /// Wrong PIN; state unchanged, no event appended
    IncorrectPin,
}

/// What a recorded critical violation did to the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationRecord {
    /// Honor after the penalty, clamped to 0..=100
    pub honor: i64,
    /// Penalty that was applied
    pub penalty: i64,
}

/// The mode state machine, bound to an open database.
pub struct Session<'a> {
    db: &'a Db,
    mode: Mode,
}

impl<'a> Session<'a> {
    /// Attach to the database, loading the initial mode from
    /// `settings.strict_mode`.
    pub fn attach(db: &'a Db) -> Result<Self> {
        let settings = db.settings().read()?;
        let mode = if settings.strict_mode {
            Mode::Strict
        } else {
            Mode::Admin
        };
        Ok(Self { db, mode })
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Enter strict mode. Unconditional; persists the flag and logs the
    /// change.
    pub fn enable_strict(&mut self) -> Result<()> {
        self.db.settings().write(&SettingsPatch {
            strict_mode: Some(true),
            ..Default::default()
        })?;
        self.db
            .events()
            .append(EventType::StrictModeChanged, Some(json!({"enabled": true})))?;
        self.mode = Mode::Strict;
        Ok(())
    }

    /// Attempt to leave strict mode with a submitted PIN.
    ///
    /// Refuses with [`ExitStrictOutcome::NoPinSet`] if no PIN was ever
    /// set (a distinct outcome, not "wrong PIN"). The digest comparison
    /// is constant-time. On success persists `strict_mode=false` and
    /// logs the change; on a wrong PIN nothing is persisted or logged.
    pub fn try_exit_strict(&mut self, pin: &str) -> Result<ExitStrictOutcome> {
        let settings = self.db.settings().read()?;

        if settings.strict_pin_hash.is_empty() {
            return Ok(ExitStrictOutcome::NoPinSet);
        }

        if !digest_matches(&sha256_hex(pin), &settings.strict_pin_hash) {
            return Ok(ExitStrictOutcome::IncorrectPin);
        }

        self.db.settings().write(&SettingsPatch {
            strict_mode: Some(false),
            ..Default::default()
        })?;
        self.db.events().append(
            EventType::StrictModeChanged,
            Some(json!({"enabled": false})),
        )?;
        self.mode = Mode::Admin;
        Ok(ExitStrictOutcome::Exited)
    }

    /// Set the strict-mode PIN, storing only its one-way digest.
    ///
    /// # Errors
    ///
    /// Returns `AuraError::Validation` unless `new_pin` is 4–8 ASCII
    /// digits; the existing hash is left untouched on rejection.
    pub fn set_pin(&mut self, new_pin: &str) -> Result<()> {
        if !is_valid_pin(new_pin) {
            return Err(AuraError::Validation(
                "PIN must be 4-8 digits".to_string(),
            ));
        }
        self.db.settings().write(&SettingsPatch {
            strict_pin_hash: Some(sha256_hex(new_pin)),
            ..Default::default()
        })?;
        Ok(())
    }

    /// Record a critical violation.
    ///
    /// Callable from either mode; deterministically forces strict mode
    /// (violations can only tighten, never loosen), applies the honor
    /// penalty clamped to `[0, 100]`, persists both in one settings
    /// write, and logs a `critical_violation` event.
    pub fn record_critical_violation(&mut self, kind: &str) -> Result<ViolationRecord> {
        let settings = self.db.settings().read()?;
        let penalty = settings.critical_penalty;
        let honor = (settings.honor - penalty).clamp(0, 100);

        self.db.settings().write(&SettingsPatch {
            honor: Some(honor),
            strict_mode: Some(true),
            ..Default::default()
        })?;
        self.mode = Mode::Strict;

        self.db.events().append(
            EventType::CriticalViolation,
            Some(json!({"kind": kind, "penalty": penalty})),
        )?;

        Ok(ViolationRecord { honor, penalty })
    }

    /// Sign the contract, stamping the current time.
    pub fn sign_contract(&mut self) -> Result<()> {
        self.db.settings().write(&SettingsPatch {
            contract_signed_at: Some(now_ms()),
            ..Default::default()
        })?;
        self.db
            .events()
            .append(EventType::ContractSigned, Some(json!({})))?;
        Ok(())
    }

    /// Renew the contract, restarting the freshness window.
    pub fn renew_contract(&mut self) -> Result<()> {
        self.db.settings().write(&SettingsPatch {
            contract_signed_at: Some(now_ms()),
            ..Default::default()
        })?;
        self.db
            .events()
            .append(EventType::ContractRenewed, Some(json!({})))?;
        Ok(())
    }

    /// Whether the contract is currently valid (consulted by the
    /// presentation layer for feature visibility; never constrains mode
    /// transitions).
    pub fn contract_ok(&self) -> Result<bool> {
        let settings = self.db.settings().read()?;
        Ok(settings.contract_ok(now_ms()))
    }
}

fn is_valid_pin(pin: &str) -> bool {
    (4..=8).contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit())
}
