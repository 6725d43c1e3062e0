//! Store trait definitions.
//!
//! `IdentityStore` is the collaborator the token service persists users
//! through; `NoteStore` holds sealed notes. Both are implemented by
//! [`SqliteStore`](super::SqliteStore).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{NewNote, NewUser, Note, User};
use crate::error::Result;

/// Account persistence for the token service.
///
/// All implementations must ensure:
/// - Usernames are unique
/// - `record_failed_login` and `swap_refresh_token` are atomic single-record
///   updates, so concurrent callers never lose increments and concurrent
///   rotations resolve first-writer-wins
pub trait IdentityStore: Send + Sync {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RamzError::UsernameTaken` if the username already exists.
    fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Get a user by username.
    ///
    /// Returns `Ok(None)` if not found.
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by ID.
    fn find_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Get the user whose refresh-token slot holds exactly `token`.
    fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>>;

    /// Overwrite every mutable field of an existing user.
    ///
    /// A plain last-writer-wins write with no compare step. Lockout counters
    /// and the refresh slot must go through `record_failed_login`,
    /// `reset_login_attempts` and `swap_refresh_token` instead, which are
    /// atomic against concurrent requests.
    fn save_user(&self, user: &User) -> Result<()>;

    /// Increment the failed-login counter and, when it reaches
    /// `max_attempts`, set `lock_until`. A lock that lapsed before `now`
    /// restarts the counter at this failure. Returns the updated record.
    fn record_failed_login(
        &self,
        id: &Uuid,
        max_attempts: u32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<User>;

    /// Reset the failed-login counter and clear `lock_until`.
    fn reset_login_attempts(&self, id: &Uuid, now: DateTime<Utc>) -> Result<()>;

    /// Replace the refresh-token slot only if it currently holds `expected`.
    ///
    /// Returns `Ok(false)` when the slot held something else (or the user is
    /// gone), leaving it untouched.
    fn swap_refresh_token(
        &self,
        id: &Uuid,
        expected: Option<&str>,
        new: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Unconditionally overwrite the refresh-token slot.
    fn set_refresh_token(&self, id: &Uuid, token: Option<&str>, now: DateTime<Utc>)
        -> Result<()>;
}

/// Ciphertext persistence. The store never sees plaintext.
pub trait NoteStore: Send + Sync {
    /// Insert a new note and return it with its assigned ID.
    fn insert_note(&self, note: &NewNote) -> Result<Note>;

    /// Get a note by ID regardless of expiry.
    fn get_note(&self, id: &Uuid) -> Result<Option<Note>>;

    /// Delete a note owned by `owner_id`.
    ///
    /// Returns `Ok(false)` if no such note belongs to that owner.
    fn delete_note(&self, id: &Uuid, owner_id: &Uuid) -> Result<bool>;

    /// List an owner's notes, newest first.
    fn list_notes(&self, owner_id: &Uuid) -> Result<Vec<Note>>;
}
