//! `aura contract` - sign, renew, and inspect the contract.

use chrono::TimeZone;

use aura_core::session::Session;
use aura_core::time::days_between;
use aura_core::Db;

use crate::app::ensure_admin;

pub fn sign(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;
    ensure_admin(&session)?;
    session.sign_contract()?;
    if !quiet {
        println!("Contract signed.");
    }
    Ok(())
}

pub fn renew(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let mut session = Session::attach(db)?;
    ensure_admin(&session)?;
    session.renew_contract()?;
    if !quiet {
        println!("Contract renewed.");
    }
    Ok(())
}

pub fn status(db: &Db) -> anyhow::Result<()> {
    let settings = db.settings().read()?;
    let now = chrono::Utc::now().timestamp_millis();

    match settings.contract_signed_at {
        None => println!("Contract has never been signed."),
        Some(signed_at) => {
            let signed_date = chrono::Local
                .timestamp_millis_opt(signed_at)
                .single()
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| signed_at.to_string());
            let age_days = days_between(signed_at, now);
            if settings.contract_ok(now) {
                println!(
                    "Contract signed {} ({} of {} days used).",
                    signed_date, age_days, settings.contract_renew_every_days
                );
            } else {
                println!(
                    "Contract signed {} but expired after {} days. Renew it: aura contract renew",
                    signed_date, settings.contract_renew_every_days
                );
            }
        }
    }
    Ok(())
}
