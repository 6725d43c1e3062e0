//! Error types for Ramzharf core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps them to
//! user-facing messages and exit codes. Every failure is per-request: no
//! variant here is fatal to the process.

use thiserror::Error;

/// Result type alias for Ramzharf operations.
pub type Result<T> = std::result::Result<T, RamzError>;

/// Core error type for Ramzharf operations.
#[derive(Debug, Error)]
pub enum RamzError {
    /// Missing or malformed caller input (client-fixable)
    #[error("Validation error: {0}")]
    Validation(String),

    /// AEAD authentication failure. Wrong password and corrupted ciphertext
    /// are indistinguishable.
    #[error("Invalid password or corrupted note")]
    Decryption,

    /// Token signature, shape, or stored-slot mismatch
    #[error("Invalid token")]
    InvalidToken,

    /// Token was well-formed but its `exp` has passed
    #[error("Token has expired")]
    ExpiredToken,

    /// Too many failed logins; no further detail is exposed
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration with a username that already exists
    #[error("Username is already taken")]
    UsernameTaken,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource existed but has expired
    #[error("Gone: {0}")]
    Gone(String),

    /// Cryptographic primitive failure other than authentication
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Invalid service configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile-sync peer unreachable or rejected the request
    #[error("Profile sync failed: {0}")]
    ProfileSync(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl RamzError {
    /// True for the errors a client answers with one refresh-then-retry.
    pub fn is_token_error(&self) -> bool {
        matches!(self, RamzError::InvalidToken | RamzError::ExpiredToken)
    }
}
