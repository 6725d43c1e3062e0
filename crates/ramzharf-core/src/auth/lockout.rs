//! Account lockout policy.
//!
//! A failed password check increments the user's counter. Reaching
//! `max_attempts` sets `lock_until = now + lock_duration`, during which every
//! login is refused regardless of the password. A successful login resets
//! both fields.

use chrono::{DateTime, Duration, Utc};

use crate::error::{RamzError, Result};

/// Default number of failed logins before the account locks.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lock duration in minutes.
pub const DEFAULT_LOCK_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lock_duration: Duration::minutes(DEFAULT_LOCK_MINUTES),
        }
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lock_duration: Duration) -> Self {
        Self {
            max_attempts,
            lock_duration,
        }
    }

    /// When a lock triggered at `now` is released.
    pub fn lock_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.lock_duration
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(RamzError::Config(
                "Lockout max_attempts must be at least 1".to_string(),
            ));
        }
        if self.lock_duration <= Duration::zero() {
            return Err(RamzError::Config(
                "Lockout duration must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
