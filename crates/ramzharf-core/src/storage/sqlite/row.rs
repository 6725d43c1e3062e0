//! Row types for database queries.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{RamzError, Result};
use crate::storage::types::{Note, User};

/// Column list matching [`UserRow::from_row`].
pub const USER_COLUMNS: &str =
    "id, username, password_hash, refresh_token, login_attempts, lock_until, created_at, updated_at";

/// Column list matching [`NoteRow::from_row`].
pub const NOTE_COLUMNS: &str = "id, owner_id, ciphertext, salt, expires_at, created_at";

/// Fixed-width timestamp encoding so stored values sort lexicographically.
pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| RamzError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| RamzError::Storage(format!("Invalid {} UUID: {}", what, e)))
}

/// Raw row data from the users table, before parsing into domain types.
#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub login_attempts: i64,
    pub lock_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            refresh_token: row.get(3)?,
            login_attempts: row.get(4)?,
            lock_until: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = RamzError;

    fn try_from(row: UserRow) -> Result<Self> {
        let login_attempts = u32::try_from(row.login_attempts)
            .map_err(|_| RamzError::Storage("Invalid login attempt counter".to_string()))?;
        let lock_until = row
            .lock_until
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(User {
            id: parse_uuid(&row.id, "user")?,
            username: row.username,
            password_hash: row.password_hash,
            refresh_token: row.refresh_token,
            login_attempts,
            lock_until,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Raw row data from the notes table.
#[derive(Debug)]
pub struct NoteRow {
    pub id: String,
    pub owner_id: String,
    pub ciphertext: String,
    pub salt: String,
    pub expires_at: Option<String>,
    pub created_at: String,
}

impl NoteRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            ciphertext: row.get(2)?,
            salt: row.get(3)?,
            expires_at: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<NoteRow> for Note {
    type Error = RamzError;

    fn try_from(row: NoteRow) -> Result<Self> {
        let expires_at = row
            .expires_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Note {
            id: parse_uuid(&row.id, "note")?,
            owner_id: parse_uuid(&row.owner_id, "owner")?,
            ciphertext: row.ciphertext,
            salt: row.salt,
            expires_at,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
