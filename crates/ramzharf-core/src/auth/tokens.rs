//! Access and refresh token signing and verification.
//!
//! Both token kinds are compact HS256 JWTs carrying `{userId, username, exp}`
//! plus `iat` and a random `jti`. They are signed with two distinct secrets,
//! so leaking one never lets an attacker forge the other. Expiry is checked
//! against the caller-supplied clock rather than the library's.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RamzError, Result};

/// Default access-token lifetime in seconds (1 hour).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;

/// Default refresh-token lifetime in seconds (7 days).
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Which secret and lifetime a token uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Secrets and lifetimes for the token service.
#[derive(Debug)]
pub struct TokenConfig {
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Build a config with the default lifetimes (access 1h, refresh 7d).
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: SecretString::from(access_secret.into()),
            refresh_secret: SecretString::from(refresh_secret.into()),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Reject empty secrets, a shared secret, and non-positive lifetimes.
    pub fn validate(&self) -> Result<()> {
        let access = self.access_secret.expose_secret();
        let refresh = self.refresh_secret.expose_secret();

        if access.is_empty() || refresh.is_empty() {
            return Err(RamzError::Config(
                "Access and refresh token secrets must be set".to_string(),
            ));
        }
        if access == refresh {
            return Err(RamzError::Config(
                "Access and refresh token secrets must differ".to_string(),
            ));
        }
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(RamzError::Config(
                "Token lifetimes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Signed claims set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// The identity a verified token asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl TryFrom<Claims> for Identity {
    type Error = RamzError;

    fn try_from(claims: Claims) -> Result<Self> {
        let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| RamzError::InvalidToken)?;
        Ok(Identity {
            user_id,
            username: claims.username,
        })
    }
}

/// An access/refresh pair as handed to the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }
}

/// Signs and verifies both token kinds.
pub struct TokenSigner {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Result<Self> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            access: KeyPair::new(&config.access_secret, config.access_ttl),
            refresh: KeyPair::new(&config.refresh_secret, config.refresh_ttl),
            validation,
        })
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a fresh token of `kind` for `user_id`/`username`.
    pub fn sign(
        &self,
        kind: TokenKind,
        user_id: &Uuid,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let keys = self.keys(kind);
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: (now + keys.ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| RamzError::Crypto(format!("Token signing failed: {}", e)))
    }

    /// Verify signature and expiry of a token of `kind`.
    ///
    /// # Errors
    ///
    /// `RamzError::InvalidToken` for a bad signature or malformed token,
    /// `RamzError::ExpiredToken` once `exp` is reached.
    pub fn verify(&self, kind: TokenKind, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|_| RamzError::InvalidToken)?;

        if data.claims.exp <= now.timestamp() {
            return Err(RamzError::ExpiredToken);
        }
        Ok(data.claims)
    }
}
