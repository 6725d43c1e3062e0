//! Best-effort propagation of new accounts to a companion user service.
//!
//! Registration calls [`ProfileSync::sync_profile`] after the account is
//! committed. Failures are reported to the caller, which logs and ignores
//! them; registration never fails because the peer is down.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RamzError, Result};

/// Path appended to the configured base URL.
pub const PROFILE_SYNC_PATH: &str = "/api/user/sync";

/// Default request timeout for the HTTP sync.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound profile notification.
pub trait ProfileSync: Send + Sync {
    fn sync_profile(&self, user_id: &Uuid, username: &str) -> Result<()>;
}

/// Does nothing. Used when no user service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfileSync;

impl ProfileSync for NoopProfileSync {
    fn sync_profile(&self, _user_id: &Uuid, _username: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SyncPayload<'a> {
    id: String,
    username: &'a str,
}

/// POSTs `{id, username}` as JSON to `{base_url}/api/user/sync`.
pub struct HttpProfileSync {
    endpoint: String,
    http_client: reqwest::blocking::Client,
}

impl HttpProfileSync {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_SYNC_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(RamzError::Config(
                "Profile sync base URL must not be empty".to_string(),
            ));
        }

        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| RamzError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("{}{}", base_url, PROFILE_SYNC_PATH),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ProfileSync for HttpProfileSync {
    fn sync_profile(&self, user_id: &Uuid, username: &str) -> Result<()> {
        let payload = SyncPayload {
            id: user_id.to_string(),
            username,
        };

        debug!(endpoint = %self.endpoint, %user_id, "Syncing profile");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .map_err(|e| RamzError::ProfileSync(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RamzError::ProfileSync(format!(
                "User service responded with {}",
                status
            )));
        }
        Ok(())
    }
}
