//! AES-256-GCM note encryption and the ciphertext wire format.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use serde::{Deserialize, Serialize};

use super::encoding::{encode_base64, random_bytes};
use super::key::{derive_key_from_password, EncryptionKey, Salt};
use crate::error::{RamzError, Result};

/// AES-GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Ciphertext and salt as shipped to the note store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedNote {
    /// base64(nonce || ciphertext || tag)
    pub ciphertext: String,
    /// base64 of the 16-byte PBKDF2 salt
    pub salt: String,
}

fn cipher_for(key: &EncryptionKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt UTF-8 text under `key`.
///
/// A fresh nonce is drawn for every call, so encrypting the same text twice
/// yields two different blobs.
pub fn encrypt(plaintext: &str, key: &EncryptionKey) -> Result<String> {
    let nonce_bytes: [u8; NONCE_LENGTH] = random_bytes()?;
    let ciphertext = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| RamzError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut packed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    packed.extend_from_slice(&nonce_bytes);
    packed.extend_from_slice(&ciphertext);

    Ok(encode_base64(&packed))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns `RamzError::Decryption` for a wrong key, a tampered or truncated
/// blob, malformed base64, or a payload that is not UTF-8. The causes are
/// deliberately not distinguished.
pub fn decrypt(blob: &str, key: &EncryptionKey) -> Result<String> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let packed = STANDARD
        .decode(blob.trim())
        .map_err(|_| RamzError::Decryption)?;
    if packed.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(RamzError::Decryption);
    }

    let (nonce, ciphertext) = packed.split_at(NONCE_LENGTH);
    let plaintext = cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| RamzError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| RamzError::Decryption)
}

/// Derive a key from `password` with a fresh salt and encrypt `plaintext`.
///
/// # Examples
///
/// ```
/// use ramzharf_core::crypto::{decrypt_with_password, encrypt_with_password};
///
/// let sealed = encrypt_with_password("hello world", "pw123456").unwrap();
/// let opened = decrypt_with_password(&sealed.ciphertext, "pw123456", &sealed.salt).unwrap();
/// assert_eq!(opened, "hello world");
/// ```
pub fn encrypt_with_password(plaintext: &str, password: &str) -> Result<SealedNote> {
    let (key, salt) = derive_key_from_password(password, None)?;
    let ciphertext = encrypt(plaintext, &key)?;
    Ok(SealedNote {
        ciphertext,
        salt: salt.to_base64(),
    })
}

/// Re-derive the key from `password` and the stored salt, then decrypt.
///
/// # Errors
///
/// Returns `RamzError::Validation` for an empty password or a malformed salt,
/// and `RamzError::Decryption` when the password is wrong or the ciphertext
/// is corrupted.
pub fn decrypt_with_password(blob: &str, password: &str, salt: &str) -> Result<String> {
    let salt = Salt::from_base64(salt)?;
    let (key, _) = derive_key_from_password(password, Some(salt))?;
    decrypt(blob, &key)
}
