//! Integration tests for accounts, sessions and session cleanup.

use chrono::{Duration, Utc};
use swing::auth::{
    generate_session_token, hash_password, run_cleanup_worker, validate_password_strength,
    validate_username, verify_password, CleanupConfig,
};
use swing::db::{
    create_session, create_user_with_profile, delete_expired_sessions, delete_session,
    delete_user_sessions, format_timestamp, get_session_by_token, get_user_by_email,
    get_user_by_id, Database,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

fn expires_in(seconds: i64) -> String {
    format_timestamp(Utc::now() + Duration::seconds(seconds))
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "SecureP@ssw0rd123";
    let hash = hash_password(password).expect("Failed to hash password");

    assert!(verify_password(password, &hash).expect("Failed to verify password"));
    assert!(!verify_password("WrongPassword", &hash).expect("Failed to verify password"));
}

#[tokio::test]
async fn test_password_strength_validation() {
    assert!(validate_password_strength("abcdefgh").is_ok());
    assert!(validate_password_strength("MyP@ssw0rd123").is_ok());

    assert!(validate_password_strength("").is_err());
    assert!(validate_password_strength("short").is_err());
    assert!(validate_password_strength("1234567").is_err());
}

#[tokio::test]
async fn test_username_validation() {
    assert!(validate_username("alice").is_ok());
    assert!(validate_username("dev_42-x").is_ok());

    assert!(validate_username("al").is_err());
    assert!(validate_username("has space").is_err());
    assert!(validate_username(&"a".repeat(31)).is_err());
}

#[tokio::test]
async fn test_user_lookup_by_email() {
    let (db, _temp_dir) = setup_test_db().await;
    let pool = db.pool();

    let hash = hash_password("password123").unwrap();
    let user_id = create_user_with_profile(pool, "alice@example.com", "alice", &hash)
        .await
        .unwrap();

    let user = get_user_by_email(pool, "Alice@Example.com")
        .await
        .unwrap()
        .expect("Email lookup ignores case");
    assert_eq!(user.id, user_id);
    assert_eq!(user.username, "alice");
    assert!(verify_password("password123", &user.password_hash).unwrap());

    let user = get_user_by_id(pool, user_id).await.unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");

    assert!(get_user_by_email(pool, "nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (db, _temp_dir) = setup_test_db().await;
    let pool = db.pool();

    let user_id = create_user_with_profile(pool, "bob@example.com", "bob", "hash")
        .await
        .unwrap();

    let token = generate_session_token();
    create_session(pool, user_id, &token, Some("test-agent"), &expires_in(3600))
        .await
        .unwrap();

    let session = get_session_by_token(pool, &token)
        .await
        .unwrap()
        .expect("Session should exist");
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.user_agent.as_deref(), Some("test-agent"));

    delete_session(pool, &token).await.unwrap();
    assert!(get_session_by_token(pool, &token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_user_sessions() {
    let (db, _temp_dir) = setup_test_db().await;
    let pool = db.pool();

    let user_id = create_user_with_profile(pool, "carol@example.com", "carol", "hash")
        .await
        .unwrap();
    for _ in 0..3 {
        create_session(pool, user_id, &generate_session_token(), None, &expires_in(3600))
            .await
            .unwrap();
    }

    assert_eq!(delete_user_sessions(pool, user_id).await.unwrap(), 3);
    assert_eq!(delete_user_sessions(pool, user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_expired_sessions() {
    let (db, _temp_dir) = setup_test_db().await;
    let pool = db.pool();

    let user_id = create_user_with_profile(pool, "dave@example.com", "dave", "hash")
        .await
        .unwrap();

    let expired = generate_session_token();
    let live = generate_session_token();
    create_session(pool, user_id, &expired, None, &expires_in(-60))
        .await
        .unwrap();
    create_session(pool, user_id, &live, None, &expires_in(3600))
        .await
        .unwrap();

    assert_eq!(delete_expired_sessions(pool).await.unwrap(), 1);
    assert!(get_session_by_token(pool, &expired).await.unwrap().is_none());
    assert!(get_session_by_token(pool, &live).await.unwrap().is_some());
}

#[tokio::test]
async fn test_cleanup_worker_runs_and_stops() {
    let (db, _temp_dir) = setup_test_db().await;
    let pool = db.pool().clone();

    let user_id = create_user_with_profile(&pool, "erin@example.com", "erin", "hash")
        .await
        .unwrap();
    let expired = generate_session_token();
    create_session(&pool, user_id, &expired, None, &expires_in(-60))
        .await
        .unwrap();

    let shutdown = CancellationToken::new();
    shutdown.cancel();

    // Runs one cleanup pass before honouring the cancellation.
    run_cleanup_worker(pool.clone(), CleanupConfig::default(), shutdown).await;

    assert!(get_session_by_token(&pool, &expired).await.unwrap().is_none());
}
