//! The persisted client session (`session.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use ramzharf_core::auth::TokenPair;

use crate::errors::CliError;

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub username: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl StoredSession {
    pub fn new(username: impl Into<String>, tokens: TokenPair) -> Self {
        Self {
            username: username.into(),
            tokens,
        }
    }
}

pub fn load_session(path: &Path) -> anyhow::Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read session {}: {}", path.display(), e))?;
    let session = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse session {}: {}", path.display(), e))?;
    Ok(Some(session))
}

/// Load the session or fail with a login hint.
pub fn require_session(path: &Path) -> anyhow::Result<StoredSession> {
    load_session(path)?.ok_or_else(|| {
        CliError::auth_failed_with_hint(
            "Not logged in",
            "Run:\n  ramzharf login <USERNAME>",
        )
        .into()
    })
}

pub fn save_session(path: &Path, session: &StoredSession) -> anyhow::Result<()> {
    let contents = serde_json::to_vec_pretty(session)?;
    ramzharf_core::fs::write_private(path, &contents)
        .map_err(|e| anyhow::anyhow!("Failed to write session {}: {}", path.display(), e))
}

pub fn delete_session(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to remove session {}: {}",
            path.display(),
            e
        )),
    }
}
