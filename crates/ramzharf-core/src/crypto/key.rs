//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Note keys are derived from a user-supplied password and a random salt.
//! The derivation is deterministic in (password, salt), which is what lets a
//! recipient re-derive the key on the decrypt side.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use super::encoding::{decode_base64, encode_base64, random_bytes};
use crate::error::{RamzError, Result};

/// PBKDF2 iteration count. Changing it breaks every stored note.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of a note key in bytes (256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Length of a key-derivation salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// A 256-bit AES-GCM key.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Random, non-secret salt stored next to the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Draw a fresh salt from the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        Ok(Self(random_bytes()?))
    }

    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }

    /// Parse a base64 salt. Anything other than exactly 16 bytes is rejected.
    pub fn from_base64(value: &str) -> Result<Self> {
        let bytes = decode_base64(value, "salt")?;
        let bytes: [u8; SALT_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            RamzError::Validation(format!(
                "Salt must be {} bytes (got {})",
                SALT_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

/// Derive a note key from a password.
///
/// When `salt` is `None` a fresh 16-byte salt is generated. The salt that was
/// used is returned so it can be stored next to the ciphertext.
///
/// # Errors
///
/// Returns `RamzError::Validation` if the password is empty.
///
/// # Examples
///
/// ```
/// use ramzharf_core::crypto::derive_key_from_password;
///
/// let (key, salt) = derive_key_from_password("pw123456", None).unwrap();
/// let (again, _) = derive_key_from_password("pw123456", Some(salt)).unwrap();
/// assert_eq!(key.as_bytes(), again.as_bytes());
/// ```
pub fn derive_key_from_password(
    password: &str,
    salt: Option<Salt>,
) -> Result<(EncryptionKey, Salt)> {
    if password.is_empty() {
        return Err(RamzError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let salt = match salt {
        Some(salt) => salt,
        None => Salt::generate()?,
    };

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key_bytes,
    );

    Ok((EncryptionKey::from_bytes(key_bytes), salt))
}

/// Generate a random key for flows that do not start from a password.
pub fn generate_key() -> Result<EncryptionKey> {
    Ok(EncryptionKey::from_bytes(random_bytes()?))
}

/// Export raw key material as base64.
///
/// Only meant to carry a key across an operation boundary inside one trusted
/// process. Never persist the result.
pub fn export_key(key: &EncryptionKey) -> String {
    encode_base64(key.as_bytes())
}

/// Import raw key material previously produced by [`export_key`].
pub fn import_key(encoded: &str) -> Result<EncryptionKey> {
    let bytes = zeroize::Zeroizing::new(decode_base64(encoded, "key")?);
    if bytes.len() != KEY_LENGTH {
        return Err(RamzError::Validation(format!(
            "Key must be {} bytes (got {})",
            KEY_LENGTH,
            bytes.len()
        )));
    }
    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&bytes);
    Ok(EncryptionKey::from_bytes(key))
}
