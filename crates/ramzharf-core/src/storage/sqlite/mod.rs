//! SQLite storage backend.
//!
//! One connection guarded by a mutex serves both the identity store and the
//! note store. The handle is constructed explicitly with [`SqliteStore::open`]
//! and released with [`SqliteStore::close`].

mod row;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use crate::error::{RamzError, Result};
use crate::storage::traits::{IdentityStore, NoteStore};
use crate::storage::types::{NewNote, NewUser, Note, User};

use row::{timestamp, NoteRow, UserRow, NOTE_COLUMNS, USER_COLUMNS};

/// Current schema version recorded in the `meta` table.
const SCHEMA_VERSION: &str = "1";

/// SQLite-backed identity and note store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        debug!(path = %path.display(), "opened sqlite store");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                refresh_token TEXT,
                login_attempts INTEGER NOT NULL DEFAULT 0,
                lock_until TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS users_refresh_token
            ON users (refresh_token);

            CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                ciphertext TEXT NOT NULL,
                salt TEXT NOT NULL,
                expires_at TEXT,
                created_at TEXT NOT NULL,

                FOREIGN KEY (owner_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS notes_owner_created
            ON notes (owner_id, created_at);
            "#,
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?)",
            [SCHEMA_VERSION],
        )?;
        let version: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )?;
        if version != SCHEMA_VERSION {
            return Err(RamzError::Storage(format!(
                "Unsupported schema version {} (expected {})",
                version, SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    /// Release the connection.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| RamzError::Storage("SQLite connection poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| RamzError::from(e))
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RamzError::Storage("SQLite connection poisoned".to_string()))
    }

    fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        conn.query_row(&sql, [value], UserRow::from_row)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn query_note(conn: &Connection, id: &Uuid) -> Result<Option<Note>> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS);
        conn.query_row(&sql, [id.to_string()], NoteRow::from_row)
            .optional()?
            .map(Note::try_from)
            .transpose()
    }
}

impl IdentityStore for SqliteStore {
    fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM users WHERE username = ?",
                [&user.username],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(RamzError::UsernameTaken);
        }

        let id = Uuid::new_v4();
        let created_at = timestamp(user.created_at);
        tx.execute(
            r#"
            INSERT INTO users (
                id,
                username,
                password_hash,
                refresh_token,
                login_attempts,
                lock_until,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, NULL, 0, NULL, ?, ?)
            "#,
            (
                id.to_string(),
                &user.username,
                &user.password_hash,
                &created_at,
                &created_at,
            ),
        )?;

        let created = Self::query_user(&tx, "id", &id.to_string())?
            .ok_or_else(|| RamzError::Storage("Inserted user not readable".to_string()))?;
        tx.commit()?;

        Ok(created)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        Self::query_user(&conn, "username", username)
    }

    fn find_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        Self::query_user(&conn, "id", &id.to_string())
    }

    fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        Self::query_user(&conn, "refresh_token", token)
    }

    fn save_user(&self, user: &User) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE users
            SET username = ?,
                password_hash = ?,
                refresh_token = ?,
                login_attempts = ?,
                lock_until = ?,
                updated_at = ?
            WHERE id = ?
            "#,
            (
                &user.username,
                &user.password_hash,
                &user.refresh_token,
                i64::from(user.login_attempts),
                user.lock_until.map(timestamp),
                timestamp(user.updated_at),
                user.id.to_string(),
            ),
        )?;
        if changed == 0 {
            return Err(RamzError::NotFound(format!("user {}", user.id)));
        }
        Ok(())
    }

    fn record_failed_login(
        &self,
        id: &Uuid,
        max_attempts: u32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        // Right-hand sides read the pre-update row, so the counter and the
        // lock are decided from one consistent value. A lock that has lapsed
        // restarts the count at this failure.
        let changed = tx.execute(
            r#"
            UPDATE users
            SET login_attempts = CASE
                    WHEN lock_until IS NOT NULL AND lock_until <= ?3 THEN 1
                    ELSE login_attempts + 1
                END,
                lock_until = CASE
                    WHEN lock_until IS NOT NULL AND lock_until <= ?3 THEN
                        CASE WHEN 1 >= ?1 THEN ?2 ELSE NULL END
                    WHEN login_attempts + 1 >= ?1 THEN ?2
                    ELSE lock_until
                END,
                updated_at = ?3
            WHERE id = ?4
            "#,
            (
                i64::from(max_attempts),
                timestamp(lock_until),
                timestamp(now),
                id.to_string(),
            ),
        )?;
        if changed == 0 {
            return Err(RamzError::NotFound(format!("user {}", id)));
        }

        let user = Self::query_user(&tx, "id", &id.to_string())?
            .ok_or_else(|| RamzError::NotFound(format!("user {}", id)))?;
        tx.commit()?;

        Ok(user)
    }

    fn reset_login_attempts(&self, id: &Uuid, now: DateTime<Utc>) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "UPDATE users SET login_attempts = 0, lock_until = NULL, updated_at = ? WHERE id = ?",
            (timestamp(now), id.to_string()),
        )?;
        Ok(())
    }

    fn swap_refresh_token(
        &self,
        id: &Uuid,
        expected: Option<&str>,
        new: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.lock_conn()?;
        // `IS` compares NULL to NULL as equal.
        let changed = conn.execute(
            "UPDATE users SET refresh_token = ?1, updated_at = ?2 WHERE id = ?3 AND refresh_token IS ?4",
            (new, timestamp(now), id.to_string(), expected),
        )?;
        Ok(changed == 1)
    }

    fn set_refresh_token(
        &self,
        id: &Uuid,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "UPDATE users SET refresh_token = ?, updated_at = ? WHERE id = ?",
            (token, timestamp(now), id.to_string()),
        )?;
        if changed == 0 {
            return Err(RamzError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

impl NoteStore for SqliteStore {
    fn insert_note(&self, note: &NewNote) -> Result<Note> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let id = Uuid::new_v4();
        tx.execute(
            r#"
            INSERT INTO notes (id, owner_id, ciphertext, salt, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            (
                id.to_string(),
                note.owner_id.to_string(),
                &note.ciphertext,
                &note.salt,
                note.expires_at.map(timestamp),
                timestamp(note.created_at),
            ),
        )?;

        let created = Self::query_note(&tx, &id)?
            .ok_or_else(|| RamzError::Storage("Inserted note not readable".to_string()))?;
        tx.commit()?;

        Ok(created)
    }

    fn get_note(&self, id: &Uuid) -> Result<Option<Note>> {
        let conn = self.lock_conn()?;
        Self::query_note(&conn, id)
    }

    fn delete_note(&self, id: &Uuid, owner_id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "DELETE FROM notes WHERE id = ? AND owner_id = ?",
            (id.to_string(), owner_id.to_string()),
        )?;
        Ok(changed > 0)
    }

    fn list_notes(&self, owner_id: &Uuid) -> Result<Vec<Note>> {
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT {} FROM notes WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
            NOTE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([owner_id.to_string()], NoteRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(Note::try_from).collect()
    }
}
