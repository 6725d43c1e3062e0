//! JSON output formatting.

use chrono::{DateTime, Utc};

use ramzharf_core::storage::{Note, User};

/// A stored note (ciphertext only) as JSON.
pub fn note_json(note: &Note, now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "id": note.id,
        "ownerId": note.owner_id,
        "encryptedContent": note.ciphertext,
        "salt": note.salt,
        "expiresAt": note.expires_at,
        "createdAt": note.created_at,
        "expired": note.is_expired(now),
    })
}

pub fn notes_json(notes: &[Note], now: DateTime<Utc>) -> Vec<serde_json::Value> {
    notes.iter().map(|note| note_json(note, now)).collect()
}

/// A decrypted note as JSON.
pub fn opened_note_json(note: &Note, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": note.id,
        "content": content,
        "expiresAt": note.expires_at,
        "createdAt": note.created_at,
    })
}

/// Public account fields. Never includes the hash or tokens.
pub fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "username": user.username,
        "createdAt": user.created_at,
    })
}
