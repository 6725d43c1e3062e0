//! Path resolution for config, database and session files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_session_path, read_config, RamzharfConfig};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn resolve_session_path() -> anyhow::Result<PathBuf> {
    default_session_path()
}

/// Load the config file, failing with an init hint when it is missing.
pub fn load_config() -> anyhow::Result<RamzharfConfig> {
    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        return Err(CliError::not_found(
            format!("No config found at {}", config_path.display()),
            missing_config_hint(),
        )
        .into());
    }
    read_config(&config_path)
}

/// The database path: `--db`/`RAMZHARF_DB` first, then the config file.
pub fn resolve_db_path(cli: &Cli, config: &RamzharfConfig) -> PathBuf {
    match cli.db.as_deref() {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(&config.database.path),
    }
}

pub fn missing_config_hint() -> String {
    "Run:\n  ramzharf init\n\nOr point at an existing config:\n  RAMZHARF_CONFIG=/path/to/config.toml ramzharf <command>".to_string()
}

pub fn missing_db_message(path: &Path) -> String {
    format!("No database found at {}", path.display())
}
