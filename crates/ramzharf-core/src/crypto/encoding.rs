//! Base64 and randomness helpers shared by the engine and the token service.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{RamzError, Result};

/// Fill a fixed-size buffer from the operating system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| RamzError::Crypto(format!("Random generation failed: {}", e)))?;
    Ok(bytes)
}

/// Standard (padded) base64 encoding.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64, reporting malformed input as a validation error.
pub fn decode_base64(value: &str, what: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| RamzError::Validation(format!("Invalid base64 in {}: {}", what, e)))
}
