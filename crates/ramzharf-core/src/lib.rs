//! # Ramzharf Core
//!
//! Core library for Ramzharf - password-sealed secret notes with a rotating
//! token session.
//!
//! ## Architecture
//!
//! - **crypto**: Encryption Engine (PBKDF2 key derivation, AES-256-GCM blobs)
//!   and account password hashing
//! - **auth**: Token service, account lockout, client session, profile sync
//! - **notes**: Note lifecycle and expiry
//! - **storage**: Identity store and note store traits, SQLite backend
//! - **clock**: Injectable time source

pub mod auth;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod notes;
pub mod storage;

pub use auth::{AuthService, ClientSession, LockoutPolicy, TokenConfig, TokenPair};
pub use error::{RamzError, Result};
pub use notes::NoteService;
pub use storage::SqliteStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
