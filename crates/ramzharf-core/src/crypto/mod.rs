//! Client-side note encryption.
//!
//! This module is the Encryption Engine: it derives symmetric keys from
//! passwords and seals note content so that only ciphertext ever leaves the
//! client.
//!
//! - **PBKDF2-HMAC-SHA256**: 100,000 iterations, 16-byte random salt
//! - **AES-256-GCM**: 12-byte random nonce per encryption, 16-byte tag
//!
//! ## Wire format
//!
//! A ciphertext blob is `base64(nonce || ciphertext || tag)`. The salt travels
//! separately as its own base64 string.
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of stored notes (the server only ever holds ciphertext)
//! - Offline brute-force of note passwords (PBKDF2 work factor)
//! - Tampering with stored ciphertext (AEAD tag)
//!
//! We do NOT defend against:
//! - A compromised client holding the password
//! - Weak note passwords chosen by the user
//!
//! Every call is stateless. Operations may be invoked concurrently from any
//! number of threads.

pub mod cipher;
pub mod encoding;
pub mod key;
pub mod password;

pub use cipher::{decrypt, decrypt_with_password, encrypt, encrypt_with_password, SealedNote};
pub use key::{
    derive_key_from_password, export_key, generate_key, import_key, EncryptionKey, Salt,
};
pub use password::{hash_password, validate_account_password, verify_password};
