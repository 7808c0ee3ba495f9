//! CLI configuration file and default paths.
//!
//! The config lives at `$XDG_CONFIG_HOME/aura/config.toml` and only
//! records where the database is; `--db` and `AURA_DB` override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AuraConfig {
    pub aura: AuraSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuraSection {
    pub path: String,
}

impl AuraConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            aura: AuraSection {
                path: db_path.to_string_lossy().to_string(),
            },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("aura.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<AuraConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &AuraConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

/// Resolve the database path: `--db`/`AURA_DB` first, then the config
/// file, then the default data location.
pub fn resolve_db_path(cli_db: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(db) = cli_db {
        return Ok(PathBuf::from(db));
    }

    let config_path = default_config_path()?;
    if config_path.exists() {
        let config = read_config(&config_path)?;
        return Ok(PathBuf::from(config.aura.path));
    }

    default_db_path()
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("aura"));
        }
    }
    Ok(home_dir()?.join(".config").join("aura"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("aura"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("aura"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
