use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use ramzharf_core::auth::{LockoutPolicy, TokenConfig};

use crate::helpers::parse_duration;

#[derive(Debug, Serialize, Deserialize)]
pub struct RamzharfConfig {
    pub database: DatabaseSection,
    pub tokens: TokensSection,
    #[serde(default)]
    pub lockout: LockoutSection,
    #[serde(default)]
    pub profile_sync: ProfileSyncSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokensSection {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_ttl: String,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl: String,
}

impl std::fmt::Debug for TokensSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokensSection")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LockoutSection {
    pub max_attempts: u32,
    pub lock_duration: String,
}

impl Default for LockoutSection {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lock_duration: "30m".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileSyncSection {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ProfileSyncSection {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            timeout_seconds: 5,
        }
    }
}

fn default_access_ttl() -> String {
    "1h".to_string()
}

fn default_refresh_ttl() -> String {
    "7d".to_string()
}

impl RamzharfConfig {
    pub fn new(
        db_path: PathBuf,
        access_secret: String,
        refresh_secret: String,
        profile_sync_url: Option<String>,
    ) -> Self {
        Self {
            database: DatabaseSection {
                path: db_path.to_string_lossy().to_string(),
            },
            tokens: TokensSection {
                access_secret,
                refresh_secret,
                access_ttl: default_access_ttl(),
                refresh_ttl: default_refresh_ttl(),
            },
            lockout: LockoutSection::default(),
            profile_sync: ProfileSyncSection {
                enabled: profile_sync_url.is_some(),
                base_url: profile_sync_url,
                ..ProfileSyncSection::default()
            },
        }
    }

    pub fn token_config(&self) -> anyhow::Result<TokenConfig> {
        let config = TokenConfig::new(
            self.tokens.access_secret.clone(),
            self.tokens.refresh_secret.clone(),
        )
        .with_access_ttl(parse_duration(&self.tokens.access_ttl)?)
        .with_refresh_ttl(parse_duration(&self.tokens.refresh_ttl)?);
        config.validate()?;
        Ok(config)
    }

    pub fn lockout_policy(&self) -> anyhow::Result<LockoutPolicy> {
        let policy = LockoutPolicy::new(
            self.lockout.max_attempts,
            parse_duration(&self.lockout.lock_duration)?,
        );
        policy.validate()?;
        Ok(policy)
    }

    /// Base URL and timeout when profile sync is enabled.
    pub fn profile_sync_target(&self) -> anyhow::Result<Option<(String, StdDuration)>> {
        if !self.profile_sync.enabled {
            return Ok(None);
        }
        let base_url = self
            .profile_sync
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("profile_sync.base_url is required when enabled"))?;
        Ok(Some((
            base_url,
            StdDuration::from_secs(self.profile_sync.timeout_seconds),
        )))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("ramzharf.db"))
}

pub fn default_session_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("session.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<RamzharfConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Write the config owner-only; it holds the token secrets.
pub fn write_config(path: &Path, config: &RamzharfConfig) -> anyhow::Result<()> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    ramzharf_core::fs::write_private(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("ramzharf"));
        }
    }
    Ok(home_dir()?.join(".config").join("ramzharf"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("ramzharf"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("ramzharf"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
