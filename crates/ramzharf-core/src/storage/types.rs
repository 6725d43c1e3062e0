//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account record, the unit of mutable shared state for the token service.
///
/// The refresh-token slot and the lockout fields live on the same record so
/// that one row update covers them.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Argon2 PHC string
    pub password_hash: String,

    /// Currently valid refresh token (single slot)
    pub refresh_token: Option<String>,

    /// Consecutive failed logins since the last success
    pub login_attempts: u32,

    /// Logins are refused until this instant
    pub lock_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True while `lock_until` lies in the future.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("login_attempts", &self.login_attempts)
            .field("lock_until", &self.lock_until)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Builder for creating new users.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at,
        }
    }
}

/// A stored note. Content is ciphertext only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// base64(nonce || ciphertext || tag)
    pub ciphertext: String,

    /// base64 PBKDF2 salt
    pub salt: String,

    /// After this instant reads report the note as gone
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Builder for creating new notes.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub owner_id: Uuid,
    pub ciphertext: String,
    pub salt: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    pub fn new(
        owner_id: Uuid,
        ciphertext: impl Into<String>,
        salt: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_id,
            ciphertext: ciphertext.into(),
            salt: salt.into(),
            expires_at: None,
            created_at,
        }
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}
