//! `aura status` - the landing surface; opening it logs `app_opened`.

use owo_colors::OwoColorize;
use serde_json::json;

use aura_core::session::{Mode, Session};
use aura_core::storage::EventType;
use aura_core::time::ms_to_hhmm;
use aura_core::Db;

use crate::app::today_key;

pub fn run(db: &Db, quiet: bool) -> anyhow::Result<()> {
    let session = Session::attach(db)?;
    let settings = db.settings().read()?;

    db.events()
        .append(EventType::AppOpened, Some(json!({"day": today_key()})))?;

    if quiet {
        println!("{} {}", session.mode(), settings.honor);
        return Ok(());
    }

    println!("{}", "High Aura".bold());
    println!("Privado • Offline");
    println!();

    let mode_label = match session.mode() {
        Mode::Strict => "STRICT".red().to_string(),
        Mode::Admin => "ADMIN".green().to_string(),
    };
    println!("Honor  {}/100", settings.honor.bold());
    println!("Mode   {}", mode_label);
    println!(
        "Day    wake {} • lunch {} • sleep {}",
        ms_to_hhmm(settings.wake_ms),
        ms_to_hhmm(settings.lunch_ms),
        ms_to_hhmm(settings.sleep_ms)
    );

    if session.contract_ok()? {
        println!("Contract is valid.");
    } else {
        println!("{}", "Contract missing or expired. Sign it: aura contract sign".yellow());
    }

    println!("Events {}", db.events().count()?);
    Ok(())
}
