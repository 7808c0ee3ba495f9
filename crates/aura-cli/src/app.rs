//! Shared command plumbing: database resolution, mode gating, prompts.

use dialoguer::Password;

use aura_core::session::{Mode, Session};
use aura_core::Db;

use crate::cli::Cli;
use crate::config;

/// Open (creating if necessary) the database the CLI points at.
pub fn open_db(cli: &Cli) -> anyhow::Result<Db> {
    let path = config::resolve_db_path(cli.db.as_deref())?;
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create data directory {}: {}", parent.display(), e)
            })?;
        }
        _ => {}
    }
    Ok(Db::open(&path)?)
}

/// Refuse configuration-surface commands while in strict mode.
pub fn ensure_admin(session: &Session) -> anyhow::Result<()> {
    if session.mode() == Mode::Strict {
        anyhow::bail!("Strict mode is on. Leave it first: aura strict exit");
    }
    Ok(())
}

/// Hidden passphrase prompt, optionally with confirmation.
pub fn prompt_passphrase(confirm: bool) -> anyhow::Result<String> {
    let mut prompt = Password::new().with_prompt("Backup passphrase (min 8 characters)");
    if confirm {
        prompt = prompt.with_confirmation("Confirm passphrase", "Passphrases do not match");
    }
    Ok(prompt.interact()?)
}

/// Hidden PIN prompt.
pub fn prompt_pin(label: &str) -> anyhow::Result<String> {
    Ok(Password::new().with_prompt(label).interact()?)
}

/// Local date key, `YYYY-MM-DD`.
pub fn today_key() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
