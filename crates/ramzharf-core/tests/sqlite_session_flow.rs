use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, Utc};
use tempfile::tempdir;

use ramzharf_core::auth::{AuthService, ClientSession, LockoutPolicy, TokenConfig};
use ramzharf_core::clock::ManualClock;
use ramzharf_core::crypto::{decrypt_with_password, encrypt_with_password};
use ramzharf_core::clock::Clock;
use ramzharf_core::storage::{IdentityStore, NewUser, SqliteStore};
use ramzharf_core::{NoteService, RamzError};

fn token_config() -> TokenConfig {
    TokenConfig::new("integration-access-secret", "integration-refresh-secret")
}

#[test]
fn test_alice_is_locked_after_five_failures() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let auth = AuthService::new(store, &token_config()).expect("service should build");

    let (user, pair) = auth
        .register("alice", "secret1", "secret1")
        .expect("register should succeed");
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(
        auth.verify_access(&pair.access_token)
            .expect("access token should verify")
            .user_id,
        user.id
    );

    for _ in 0..5 {
        let result = auth.login("alice", "wrong");
        assert!(matches!(result, Err(RamzError::InvalidCredentials)));
    }

    let result = auth.login("alice", "secret1");
    assert!(matches!(result, Err(RamzError::AccountLocked)));
}

#[test]
fn test_lock_expiry_then_success_resets_counter() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth = AuthService::new(store.clone(), &token_config())
        .expect("service should build")
        .with_clock(clock.clone())
        .with_lockout_policy(LockoutPolicy::default())
        .expect("default policy is valid");

    auth.register("alice", "secret1", "secret1")
        .expect("register should succeed");
    for _ in 0..5 {
        let _ = auth.login("alice", "wrong");
    }

    clock.advance(Duration::minutes(30));
    auth.login("alice", "secret1")
        .expect("login after lock expiry should succeed");

    let user = store
        .find_user_by_username("alice")
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(user.login_attempts, 0);
    assert!(user.lock_until.is_none());
}

#[test]
fn test_failure_after_lock_lapses_does_not_relock() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth = AuthService::new(store.clone(), &token_config())
        .expect("service should build")
        .with_clock(clock.clone());

    auth.register("alice", "secret1", "secret1")
        .expect("register should succeed");
    for _ in 0..5 {
        let _ = auth.login("alice", "wrong");
    }

    clock.advance(Duration::minutes(30));
    assert!(matches!(
        auth.login("alice", "wrong"),
        Err(RamzError::InvalidCredentials)
    ));

    let user = store
        .find_user_by_username("alice")
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(user.login_attempts, 1);
    assert!(!user.is_locked(clock.now()));

    auth.login("alice", "secret1")
        .expect("one failure after the lock lapsed should not relock");
}

#[test]
fn test_concurrent_failures_are_all_counted() {
    const THREADS: usize = 8;

    let dir = tempdir().expect("tempdir should succeed");
    let store = SqliteStore::open(&dir.path().join("ramzharf.db")).expect("open should succeed");
    let user = store
        .create_user(&NewUser::new("alice", "$argon2id$hash", Utc::now()))
        .expect("create should succeed");

    let barrier = Barrier::new(THREADS);
    let now = Utc::now();
    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                store
                    .record_failed_login(&user.id, 100, now + Duration::minutes(30), now)
                    .expect("record should succeed");
            });
        }
    });

    let user = store
        .find_user_by_id(&user.id)
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(user.login_attempts, THREADS as u32);
    assert!(user.lock_until.is_none());
}

#[test]
fn test_concurrent_rotations_have_one_winner() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = Arc::new(
        SqliteStore::open(&dir.path().join("ramzharf.db")).expect("open should succeed"),
    );
    let auth = AuthService::new(store, &token_config()).expect("service should build");
    let (_, pair) = auth
        .register("alice", "secret1", "secret1")
        .expect("register should succeed");

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    auth.rotate_refresh(&pair.refresh_token)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("rotation thread should not panic"))
            .collect()
    });

    let winners = results.iter().filter(|result| result.is_ok()).count();
    let losers = results
        .iter()
        .filter(|result| matches!(result, Err(RamzError::InvalidToken)))
        .count();
    assert_eq!((winners, losers), (1, 1));
}

#[test]
fn test_hello_world_round_trip_through_note_store() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let auth = AuthService::new(store.clone(), &token_config()).expect("service should build");
    let notes = NoteService::new(store);

    let (user, _) = auth
        .register("alice", "secret1", "secret1")
        .expect("register should succeed");

    let sealed = encrypt_with_password("hello world", "pw123456").expect("encrypt should succeed");
    let note = notes
        .create(&user.id, &sealed, None)
        .expect("create should succeed");

    let fetched = notes.fetch(&note.id).expect("fetch should succeed");
    let opened = decrypt_with_password(&fetched.ciphertext, "pw123456", &fetched.salt)
        .expect("decrypt should succeed");
    assert_eq!(opened, "hello world");

    let result = decrypt_with_password(&fetched.ciphertext, "pw12345", &fetched.salt);
    assert!(matches!(result, Err(RamzError::Decryption)));
}

#[test]
fn test_rotation_rejects_replayed_token() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let auth = AuthService::new(store, &token_config()).expect("service should build");

    let (_, first) = auth
        .register("alice", "secret1", "secret1")
        .expect("register should succeed");

    let second = auth
        .rotate_refresh(&first.refresh_token)
        .expect("first rotation should succeed");
    assert!(matches!(
        auth.rotate_refresh(&first.refresh_token),
        Err(RamzError::InvalidToken)
    ));
    auth.rotate_refresh(&second.refresh_token)
        .expect("rotating the current token should succeed");
}

#[test]
fn test_client_session_refreshes_expired_access_token() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("open should succeed"));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth = AuthService::new(store, &token_config())
        .expect("service should build")
        .with_clock(clock.clone());

    let (user, pair) = auth
        .register("alice", "secret1", "secret1")
        .expect("register should succeed");
    let mut session = ClientSession::new(pair.clone());

    clock.advance(Duration::hours(2));
    let verified = session
        .call(&auth, |access| auth.verify(access))
        .expect("call should succeed after one refresh");

    assert_eq!(verified.id, user.id);
    assert!(session.was_refreshed());
    assert_ne!(session.tokens().refresh_token, pair.refresh_token);
}

#[test]
fn test_store_survives_reopen() {
    let dir = tempdir().expect("tempdir should be created");
    let path = dir.path().join("ramzharf.db");

    let user_id = {
        let store = Arc::new(SqliteStore::open(&path).expect("open should succeed"));
        let auth =
            AuthService::new(store.clone(), &token_config()).expect("service should build");
        let (user, _) = auth
            .register("alice", "secret1", "secret1")
            .expect("register should succeed");
        drop(auth);
        Arc::try_unwrap(store)
            .ok()
            .expect("store should have one owner")
            .close()
            .expect("close should succeed");
        user.id
    };

    let store = SqliteStore::open(&path).expect("reopen should succeed");
    let user = store
        .find_user_by_id(&user_id)
        .expect("lookup should succeed")
        .expect("user should persist");
    assert_eq!(user.username, "alice");
    assert!(user.refresh_token.is_some());
}
