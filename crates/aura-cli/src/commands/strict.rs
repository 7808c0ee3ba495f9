//! `aura strict` and `aura violation` - the mode machine surface.

use aura_core::session::{ExitStrictOutcome, Session};
use aura_core::Db;

use crate::app::{ensure_admin, prompt_pin};

pub fn on(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;
    session.enable_strict()?;
    if !quiet {
        println!("Strict mode is on. Exit requires the PIN.");
    }
    Ok(())
}

pub fn exit(db: &Db, pin: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;

    let pin = match pin {
        Some(value) => value.to_string(),
        None => prompt_pin("PIN")?,
    };

    match session.try_exit_strict(&pin)? {
        ExitStrictOutcome::Exited => {
            if !quiet {
                println!("Strict mode is off.");
            }
            Ok(())
        }
        ExitStrictOutcome::NoPinSet => {
            anyhow::bail!("No PIN has been set. Set one in admin mode: aura strict set-pin")
        }
        ExitStrictOutcome::IncorrectPin => anyhow::bail!("Incorrect PIN"),
    }
}

pub fn set_pin(db: &Db, pin: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;
    ensure_admin(&session)?;

    let pin = match pin {
        Some(value) => value.to_string(),
        None => prompt_pin("New PIN (4-8 digits)")?,
    };

    session.set_pin(&pin)?;
    if !quiet {
        println!("PIN set.");
    }
    Ok(())
}

pub fn violation(db: &Db, kind: &str, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;
    let record = session.record_critical_violation(kind)?;

    if !quiet {
        println!(
            "Critical violation \"{}\" recorded: -{} honor (now {}/100). Strict mode is on.",
            kind, record.penalty, record.honor
        );
    }
    Ok(())
}
