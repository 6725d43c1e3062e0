//! Account password validation and hashing.
//!
//! Account passwords are stored as Argon2id PHC strings. This is unrelated to
//! note passwords, which never reach the server in any form.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::encoding::random_bytes;
use crate::error::{RamzError, Result};

/// Minimum account password length in characters.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate an account password at registration time.
///
/// # Examples
///
/// ```
/// use ramzharf_core::crypto::validate_account_password;
///
/// assert!(validate_account_password("secret1").is_ok());
/// assert!(validate_account_password("short").is_err());
/// ```
pub fn validate_account_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(RamzError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(RamzError::Validation(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = random_bytes()?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| RamzError::Crypto(format!("Failed to encode password salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| RamzError::Crypto(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` for a mismatch; only a malformed stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| RamzError::Storage(format!("Invalid stored password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(RamzError::Crypto(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_account_password("secret1").is_ok());
        assert!(validate_account_password("exactly").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_account_password("short");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 6 characters"));
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_account_password("").is_err());
        assert!(validate_account_password("      ").is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_hash() {
        assert!(matches!(
            verify_password("secret1", "not-a-phc-string"),
            Err(RamzError::Storage(_))
        ));
    }
}
