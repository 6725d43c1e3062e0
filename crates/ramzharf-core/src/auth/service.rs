//! The token service: account registration, login with lockout, pair
//! issuance, rotation, revocation and verification.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::lockout::LockoutPolicy;
use super::profile_sync::{NoopProfileSync, ProfileSync};
use super::tokens::{Identity, TokenConfig, TokenKind, TokenPair, TokenSigner};
use crate::clock::{Clock, SystemClock};
use crate::crypto::{hash_password, validate_account_password, verify_password};
use crate::error::{RamzError, Result};
use crate::storage::{IdentityStore, NewUser, User};

/// Issues, rotates and verifies tokens for accounts held in an
/// [`IdentityStore`].
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    signer: TokenSigner,
    lockout: LockoutPolicy,
    clock: Arc<dyn Clock>,
    profile_sync: Arc<dyn ProfileSync>,
}

impl AuthService {
    /// Create a service with the default lockout policy, the system clock and
    /// no profile sync.
    pub fn new(store: Arc<dyn IdentityStore>, config: &TokenConfig) -> Result<Self> {
        Ok(Self {
            store,
            signer: TokenSigner::new(config)?,
            lockout: LockoutPolicy::default(),
            clock: Arc::new(SystemClock),
            profile_sync: Arc::new(NoopProfileSync),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_lockout_policy(mut self, policy: LockoutPolicy) -> Result<Self> {
        policy.validate()?;
        self.lockout = policy;
        Ok(self)
    }

    pub fn with_profile_sync(mut self, profile_sync: Arc<dyn ProfileSync>) -> Self {
        self.profile_sync = profile_sync;
        self
    }

    pub fn lockout_policy(&self) -> &LockoutPolicy {
        &self.lockout
    }

    /// Sign a fresh pair and store the refresh token in the user's slot,
    /// replacing whatever it held.
    pub fn issue_pair(&self, user_id: &Uuid, username: &str) -> Result<TokenPair> {
        let now = self.clock.now();
        let pair = self.sign_pair(user_id, username)?;
        self.store
            .set_refresh_token(user_id, Some(&pair.refresh_token), now)?;

        debug!(%user_id, "Issued token pair");
        Ok(pair)
    }

    /// Check signature and expiry of an access token. Never touches the store.
    pub fn verify_access(&self, token: &str) -> Result<Identity> {
        let claims = self
            .signer
            .verify(TokenKind::Access, token, self.clock.now())?;
        Identity::try_from(claims)
    }

    /// Exchange a refresh token for a new pair, invalidating the presented one.
    ///
    /// # Errors
    ///
    /// `RamzError::InvalidToken` when the token does not verify, its owner is
    /// gone, it is no longer the stored token, or a concurrent rotation won
    /// the race. `RamzError::ExpiredToken` when it verifies but has expired.
    pub fn rotate_refresh(&self, presented: &str) -> Result<TokenPair> {
        let claims = self
            .signer
            .verify(TokenKind::Refresh, presented, self.clock.now())?;
        let identity = Identity::try_from(claims)?;

        let user = self
            .store
            .find_user_by_id(&identity.user_id)?
            .ok_or(RamzError::InvalidToken)?;

        if user.refresh_token.as_deref() != Some(presented) {
            warn!(user_id = %user.id, "Rejected superseded refresh token");
            return Err(RamzError::InvalidToken);
        }

        let pair = self.sign_pair(&user.id, &user.username)?;
        let swapped = self.store.swap_refresh_token(
            &user.id,
            Some(presented),
            Some(&pair.refresh_token),
            self.clock.now(),
        )?;
        if !swapped {
            warn!(user_id = %user.id, "Lost refresh rotation race");
            return Err(RamzError::InvalidToken);
        }

        debug!(user_id = %user.id, "Rotated refresh token");
        Ok(pair)
    }

    /// Clear the slot holding `presented`. Unknown tokens are a no-op.
    pub fn revoke(&self, presented: &str) -> Result<()> {
        if presented.is_empty() {
            return Err(RamzError::Validation(
                "Refresh token is required".to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_refresh_token(presented)? else {
            debug!("Revoke of unknown refresh token ignored");
            return Ok(());
        };

        // A concurrent rotation may have replaced the token already; either
        // way the presented token is dead afterwards.
        self.store
            .swap_refresh_token(&user.id, Some(presented), None, self.clock.now())?;

        debug!(user_id = %user.id, "Revoked refresh token");
        Ok(())
    }

    /// Create an account and sign it in.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(User, TokenPair)> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(RamzError::Validation(
                "Username, password and confirmation are required".to_string(),
            ));
        }
        if password != confirm {
            return Err(RamzError::Validation("Passwords do not match".to_string()));
        }
        validate_account_password(password)?;

        let hash = hash_password(password)?;
        let user = self
            .store
            .create_user(&NewUser::new(username, hash, self.clock.now()))?;

        let pair = self.issue_pair(&user.id, &user.username)?;
        info!(user_id = %user.id, username = %user.username, "Registered user");

        if let Err(e) = self.profile_sync.sync_profile(&user.id, &user.username) {
            warn!(user_id = %user.id, error = %e, "Profile sync failed");
        }

        Ok((user, pair))
    }

    /// Check credentials under the lockout policy and issue a pair.
    ///
    /// A locked account is refused before the password is looked at, so the
    /// correct password does not help while the lock holds.
    pub fn login(&self, username: &str, password: &str) -> Result<(User, TokenPair)> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(RamzError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_username(username)? else {
            warn!("Login for unknown username");
            return Err(RamzError::InvalidCredentials);
        };

        let now = self.clock.now();
        if user.is_locked(now) {
            warn!(user_id = %user.id, "Login refused while account is locked");
            return Err(RamzError::AccountLocked);
        }

        if !verify_password(password, &user.password_hash)? {
            let updated = self.store.record_failed_login(
                &user.id,
                self.lockout.max_attempts,
                self.lockout.lock_until(now),
                now,
            )?;
            if updated.is_locked(now) {
                warn!(
                    user_id = %user.id,
                    attempts = updated.login_attempts,
                    "Account locked after failed logins"
                );
            } else {
                warn!(
                    user_id = %user.id,
                    attempts = updated.login_attempts,
                    "Failed login"
                );
            }
            return Err(RamzError::InvalidCredentials);
        }

        if user.login_attempts > 0 || user.lock_until.is_some() {
            self.store.reset_login_attempts(&user.id, now)?;
        }

        let pair = self.issue_pair(&user.id, &user.username)?;
        info!(user_id = %user.id, "User logged in");

        let user = self
            .store
            .find_user_by_id(&user.id)?
            .ok_or_else(|| RamzError::NotFound(format!("user {}", user.id)))?;
        Ok((user, pair))
    }

    /// Sign out the session holding `refresh_token`.
    pub fn logout(&self, refresh_token: &str) -> Result<()> {
        self.revoke(refresh_token)?;
        info!("User logged out");
        Ok(())
    }

    /// Verify an access token and require that its user still exists.
    pub fn verify(&self, access_token: &str) -> Result<User> {
        let identity = self.verify_access(access_token)?;
        self.store
            .find_user_by_id(&identity.user_id)?
            .ok_or(RamzError::InvalidToken)
    }

    fn sign_pair(&self, user_id: &Uuid, username: &str) -> Result<TokenPair> {
        let now = self.clock.now();
        Ok(TokenPair {
            access_token: self.signer.sign(TokenKind::Access, user_id, username, now)?,
            refresh_token: self
                .signer
                .sign(TokenKind::Refresh, user_id, username, now)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::SqliteStore;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    fn service() -> (AuthService, Arc<SqliteStore>, Arc<ManualClock>) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let auth = AuthService::new(store.clone(), &TokenConfig::new("access-key", "refresh-key"))
            .unwrap()
            .with_clock(clock.clone());
        (auth, store, clock)
    }

    struct RecordingSync {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl ProfileSync for RecordingSync {
        fn sync_profile(&self, _user_id: &Uuid, username: &str) -> Result<()> {
            self.calls.lock().unwrap().push(username.to_string());
            if self.fail {
                return Err(RamzError::ProfileSync("peer down".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_register_validates_input() {
        let (auth, _, _) = service();

        assert!(matches!(
            auth.register("", "secret1", "secret1"),
            Err(RamzError::Validation(_))
        ));
        assert!(matches!(
            auth.register("alice", "secret1", "secret2"),
            Err(RamzError::Validation(_))
        ));
        assert!(matches!(
            auth.register("alice", "short", "short"),
            Err(RamzError::Validation(_))
        ));
    }

    #[test]
    fn test_register_trims_and_rejects_duplicates() {
        let (auth, store, _) = service();

        let (user, pair) = auth.register("  alice ", "secret1", "secret1").unwrap();
        assert_eq!(user.username, "alice");

        let stored = store.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(pair.refresh_token.as_str()));
        assert_ne!(stored.password_hash, "secret1");

        assert!(matches!(
            auth.register("alice", "secret1", "secret1"),
            Err(RamzError::UsernameTaken)
        ));
    }

    #[test]
    fn test_register_survives_profile_sync_failure() {
        let (auth, _, _) = service();
        let sync = Arc::new(RecordingSync {
            calls: Mutex::new(Vec::new()),
            fail: true,
        });
        let auth = auth.with_profile_sync(sync.clone());

        assert!(auth.register("alice", "secret1", "secret1").is_ok());
        assert_eq!(*sync.calls.lock().unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_login_unknown_user_and_wrong_password_look_alike() {
        let (auth, _, _) = service();
        auth.register("alice", "secret1", "secret1").unwrap();

        assert!(matches!(
            auth.login("bob", "secret1"),
            Err(RamzError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("alice", "wrong"),
            Err(RamzError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_lock_releases_after_duration() {
        let (auth, _, clock) = service();
        auth.register("alice", "secret1", "secret1").unwrap();

        for _ in 0..5 {
            assert!(matches!(
                auth.login("alice", "wrong"),
                Err(RamzError::InvalidCredentials)
            ));
        }
        assert!(matches!(
            auth.login("alice", "secret1"),
            Err(RamzError::AccountLocked)
        ));

        clock.advance(Duration::minutes(29));
        assert!(matches!(
            auth.login("alice", "secret1"),
            Err(RamzError::AccountLocked)
        ));

        clock.advance(Duration::minutes(1));
        let (user, _) = auth.login("alice", "secret1").unwrap();
        assert_eq!(user.login_attempts, 0);
        assert!(user.lock_until.is_none());
    }

    #[test]
    fn test_success_resets_partial_counter() {
        let (auth, store, _) = service();
        auth.register("alice", "secret1", "secret1").unwrap();

        for _ in 0..4 {
            let _ = auth.login("alice", "wrong");
        }
        auth.login("alice", "secret1").unwrap();

        let user = store.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.login_attempts, 0);
    }

    #[test]
    fn test_custom_lockout_policy() {
        let (auth, _, _) = service();
        let auth = auth
            .with_lockout_policy(LockoutPolicy::new(2, Duration::minutes(5)))
            .unwrap();
        auth.register("alice", "secret1", "secret1").unwrap();

        let _ = auth.login("alice", "wrong");
        let _ = auth.login("alice", "wrong");
        assert!(matches!(
            auth.login("alice", "secret1"),
            Err(RamzError::AccountLocked)
        ));
    }

    #[test]
    fn test_rotation_invalidates_previous_token() {
        let (auth, _, _) = service();
        let (_, first) = auth.register("alice", "secret1", "secret1").unwrap();

        let second = auth.rotate_refresh(&first.refresh_token).unwrap();
        assert!(matches!(
            auth.rotate_refresh(&first.refresh_token),
            Err(RamzError::InvalidToken)
        ));
        assert!(auth.rotate_refresh(&second.refresh_token).is_ok());
    }

    #[test]
    fn test_new_login_supersedes_old_refresh_token() {
        let (auth, _, _) = service();
        let (_, first) = auth.register("alice", "secret1", "secret1").unwrap();
        let (_, _second) = auth.login("alice", "secret1").unwrap();

        assert!(matches!(
            auth.rotate_refresh(&first.refresh_token),
            Err(RamzError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_expiry() {
        let (auth, _, clock) = service();
        let (_, pair) = auth.register("alice", "secret1", "secret1").unwrap();

        clock.advance(Duration::days(7));
        assert!(matches!(
            auth.rotate_refresh(&pair.refresh_token),
            Err(RamzError::ExpiredToken)
        ));
    }

    #[test]
    fn test_access_token_is_stateless() {
        let (auth, _, clock) = service();
        let (user, pair) = auth.register("alice", "secret1", "secret1").unwrap();

        auth.logout(&pair.refresh_token).unwrap();
        let identity = auth.verify_access(&pair.access_token).unwrap();
        assert_eq!(identity.user_id, user.id);

        clock.advance(Duration::hours(1));
        assert!(matches!(
            auth.verify_access(&pair.access_token),
            Err(RamzError::ExpiredToken)
        ));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let (auth, store, _) = service();
        let (user, pair) = auth.register("alice", "secret1", "secret1").unwrap();

        auth.revoke(&pair.refresh_token).unwrap();
        auth.revoke(&pair.refresh_token).unwrap();
        auth.revoke("never-issued").unwrap();

        let stored = store.find_user_by_id(&user.id).unwrap().unwrap();
        assert!(stored.refresh_token.is_none());
        assert!(matches!(
            auth.rotate_refresh(&pair.refresh_token),
            Err(RamzError::InvalidToken)
        ));
        assert!(matches!(auth.revoke(""), Err(RamzError::Validation(_))));
    }

    #[test]
    fn test_verify_requires_existing_user() {
        let (auth, _, _) = service();
        let (user, pair) = auth.register("alice", "secret1", "secret1").unwrap();
        assert_eq!(auth.verify(&pair.access_token).unwrap().id, user.id);

        let ghost = auth
            .signer
            .sign(TokenKind::Access, &Uuid::new_v4(), "ghost", auth.clock.now())
            .unwrap();
        assert!(matches!(auth.verify(&ghost), Err(RamzError::InvalidToken)));
    }
}
