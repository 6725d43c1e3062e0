//! Note lifecycle on top of a [`NoteStore`].
//!
//! Notes are immutable once created. An expired note is reported as
//! [`RamzError::Gone`], distinct from a note that never existed.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::crypto::cipher::{NONCE_LENGTH, TAG_LENGTH};
use crate::crypto::encoding::decode_base64;
use crate::crypto::{Salt, SealedNote};
use crate::error::{RamzError, Result};
use crate::storage::{NewNote, Note, NoteStore};

pub struct NoteService {
    store: Arc<dyn NoteStore>,
    clock: Arc<dyn Clock>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Store a sealed note for `owner_id`.
    ///
    /// `expires_in` of `None` means the note never expires.
    ///
    /// # Errors
    ///
    /// `RamzError::Validation` when the ciphertext is empty, not base64, or
    /// too short to hold a nonce and tag; when the salt is not 16 bytes of
    /// base64; or when `expires_in` is not positive.
    pub fn create(
        &self,
        owner_id: &Uuid,
        sealed: &SealedNote,
        expires_in: Option<Duration>,
    ) -> Result<Note> {
        if sealed.ciphertext.trim().is_empty() || sealed.salt.trim().is_empty() {
            return Err(RamzError::Validation(
                "Encrypted content and salt are required".to_string(),
            ));
        }

        let packed = decode_base64(&sealed.ciphertext, "ciphertext")?;
        if packed.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(RamzError::Validation(format!(
                "Ciphertext too short ({} bytes)",
                packed.len()
            )));
        }
        Salt::from_base64(&sealed.salt)?;

        let now = self.clock.now();
        let mut new_note = NewNote::new(
            *owner_id,
            sealed.ciphertext.trim(),
            sealed.salt.trim(),
            now,
        );
        if let Some(ttl) = expires_in {
            if ttl <= Duration::zero() {
                return Err(RamzError::Validation(
                    "Expiry must be a positive duration".to_string(),
                ));
            }
            let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
                RamzError::Validation("Expiry is too far in the future".to_string())
            })?;
            new_note = new_note.with_expires_at(expires_at);
        }

        let note = self.store.insert_note(&new_note)?;
        info!(note_id = %note.id, owner_id = %owner_id, "Created note");
        Ok(note)
    }

    /// Fetch a note by id. Anyone holding the id may fetch.
    pub fn fetch(&self, id: &Uuid) -> Result<Note> {
        let note = self
            .store
            .get_note(id)?
            .ok_or_else(|| RamzError::NotFound(format!("note {}", id)))?;

        if note.is_expired(self.clock.now()) {
            debug!(note_id = %id, "Fetched expired note");
            return Err(RamzError::Gone(format!("note {} has expired", id)));
        }
        Ok(note)
    }

    /// Delete one of `owner_id`'s notes.
    pub fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<()> {
        if !self.store.delete_note(id, owner_id)? {
            return Err(RamzError::NotFound(format!("note {}", id)));
        }
        info!(note_id = %id, "Deleted note");
        Ok(())
    }

    /// All of `owner_id`'s notes, newest first, expired ones included.
    pub fn list(&self, owner_id: &Uuid) -> Result<Vec<Note>> {
        self.store.list_notes(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crypto::encrypt_with_password;
    use crate::storage::{IdentityStore, NewUser, SqliteStore};
    use chrono::Utc;

    fn setup() -> (NoteService, Arc<ManualClock>, Uuid) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let owner = store
            .create_user(&NewUser::new("alice", "$argon2id$hash", Utc::now()))
            .unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = NoteService::new(store).with_clock(clock.clone());
        (service, clock, owner.id)
    }

    fn sealed() -> SealedNote {
        encrypt_with_password("hello world", "pw123456").unwrap()
    }

    #[test]
    fn test_create_and_fetch() {
        let (service, _, owner) = setup();
        let sealed = sealed();

        let note = service.create(&owner, &sealed, None).unwrap();
        let fetched = service.fetch(&note.id).unwrap();

        assert_eq!(fetched.ciphertext, sealed.ciphertext);
        assert_eq!(fetched.salt, sealed.salt);
        assert!(fetched.expires_at.is_none());
    }

    #[test]
    fn test_expired_note_is_gone_not_missing() {
        let (service, clock, owner) = setup();
        let note = service
            .create(&owner, &sealed(), Some(Duration::hours(1)))
            .unwrap();

        assert!(service.fetch(&note.id).is_ok());
        clock.advance(Duration::hours(1));
        assert!(matches!(service.fetch(&note.id), Err(RamzError::Gone(_))));
        assert!(matches!(
            service.fetch(&Uuid::new_v4()),
            Err(RamzError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (service, _, owner) = setup();
        let good = sealed();

        let empty = SealedNote {
            ciphertext: String::new(),
            salt: good.salt.clone(),
        };
        let short = SealedNote {
            ciphertext: "AAAA".to_string(),
            salt: good.salt.clone(),
        };
        let bad_salt = SealedNote {
            ciphertext: good.ciphertext.clone(),
            salt: "AAAA".to_string(),
        };

        for input in [&empty, &short, &bad_salt] {
            assert!(matches!(
                service.create(&owner, input, None),
                Err(RamzError::Validation(_))
            ));
        }
        assert!(matches!(
            service.create(&owner, &good, Some(Duration::zero())),
            Err(RamzError::Validation(_))
        ));
    }

    #[test]
    fn test_create_rejects_expiry_past_calendar_range() {
        let (service, _, owner) = setup();
        let result = service.create(&owner, &sealed(), Some(Duration::days(100_000_000)));
        assert!(matches!(result, Err(RamzError::Validation(_))));
        assert!(service.list(&owner).unwrap().is_empty());
    }

    #[test]
    fn test_delete_requires_owner() {
        let (service, _, owner) = setup();
        let note = service.create(&owner, &sealed(), None).unwrap();

        assert!(matches!(
            service.delete(&note.id, &Uuid::new_v4()),
            Err(RamzError::NotFound(_))
        ));
        service.delete(&note.id, &owner).unwrap();
        assert!(matches!(
            service.fetch(&note.id),
            Err(RamzError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let (service, clock, owner) = setup();
        let first = service.create(&owner, &sealed(), None).unwrap();
        clock.advance(Duration::seconds(1));
        let second = service.create(&owner, &sealed(), None).unwrap();

        let ids: Vec<Uuid> = service.list(&owner).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
