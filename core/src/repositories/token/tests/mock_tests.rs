//! Unit tests for the in-memory refresh token repository

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::value_objects::ClientContext;
use crate::errors::DomainError;
use crate::repositories::token::{MockRefreshTokenRepository, RefreshTokenRepository};

fn token_for(user_id: Uuid, hash: &str) -> RefreshToken {
    RefreshToken::new(
        user_id,
        hash.to_string(),
        Uuid::new_v4().to_string(),
        Duration::days(7),
        &ClientContext::default(),
    )
}

#[tokio::test]
async fn test_save_and_find_refresh_token() {
    let repo = MockRefreshTokenRepository::new();
    let token = token_for(Uuid::new_v4(), "test_hash");

    let saved = repo.save_refresh_token(token.clone()).await.unwrap();
    assert_eq!(saved.id, token.id);

    let found = repo.find_refresh_token("test_hash").await.unwrap().unwrap();
    assert_eq!(found, token);

    let by_jti = repo.find_by_jwt_id(&token.jwt_id).await.unwrap().unwrap();
    assert_eq!(by_jti.id, token.id);

    assert!(repo.find_refresh_token("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_hash_is_rejected() {
    let repo = MockRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.save_refresh_token(token_for(user_id, "same_hash")).await.unwrap();
    let result = repo.save_refresh_token(token_for(user_id, "same_hash")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_refresh_token() {
    let repo = MockRefreshTokenRepository::new();
    let mut token = token_for(Uuid::new_v4(), "hash");
    repo.save_refresh_token(token.clone()).await.unwrap();

    token.device_info = Some("Edge".to_string());
    repo.update_refresh_token(token.clone()).await.unwrap();

    let found = repo.find_refresh_token("hash").await.unwrap().unwrap();
    assert_eq!(found.device_info.as_deref(), Some("Edge"));

    let unknown = token_for(Uuid::new_v4(), "other");
    let result = repo.update_refresh_token(unknown).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_find_active_by_user_id_is_newest_first() {
    let repo = MockRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    for i in 0..3 {
        let mut token = token_for(user_id, &format!("hash_{}", i));
        token.created_at = now - Duration::minutes(10 - i);
        repo.save_refresh_token(token).await.unwrap();
    }
    let mut used = token_for(user_id, "used");
    used.mark_used(now);
    repo.save_refresh_token(used).await.unwrap();
    repo.save_refresh_token(token_for(Uuid::new_v4(), "other_user"))
        .await
        .unwrap();

    let active = repo.find_active_by_user_id(user_id, now).await.unwrap();
    let hashes: Vec<_> = active.iter().map(|t| t.token_hash.as_str()).collect();
    assert_eq!(hashes, vec!["hash_2", "hash_1", "hash_0"]);

    assert_eq!(repo.count_active_tokens(user_id, now).await.unwrap(), 3);
    assert_eq!(repo.find_all_by_user_id(user_id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_mark_token_used_only_once() {
    let repo = MockRefreshTokenRepository::new();
    repo.save_refresh_token(token_for(Uuid::new_v4(), "hash")).await.unwrap();
    let now = Utc::now();

    assert!(repo.mark_token_used("hash", now).await.unwrap());
    assert!(!repo.mark_token_used("hash", now).await.unwrap());
    assert!(!repo.mark_token_used("missing", now).await.unwrap());

    let found = repo.find_refresh_token("hash").await.unwrap().unwrap();
    assert!(found.is_used);
    assert_eq!(found.used_at, Some(now));
}

#[tokio::test]
async fn test_mark_token_used_rejects_revoked_and_expired() {
    let repo = MockRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    repo.save_refresh_token(token_for(user_id, "revoked")).await.unwrap();
    repo.revoke_token("revoked", "logout", now).await.unwrap();

    let mut expired = token_for(user_id, "expired");
    expired.expires_at = now;
    repo.save_refresh_token(expired).await.unwrap();

    assert!(!repo.mark_token_used("revoked", now).await.unwrap());
    assert!(!repo.mark_token_used("expired", now).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mark_token_used_has_single_winner() {
    let repo = Arc::new(MockRefreshTokenRepository::new());
    repo.save_refresh_token(token_for(Uuid::new_v4(), "contested"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.mark_token_used("contested", Utc::now()).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_revoke_token() {
    let repo = MockRefreshTokenRepository::new();
    repo.save_refresh_token(token_for(Uuid::new_v4(), "test_hash"))
        .await
        .unwrap();
    let now = Utc::now();

    assert!(repo.revoke_token("test_hash", "logout", now).await.unwrap());
    assert!(!repo.revoke_token("test_hash", "logout", now).await.unwrap());
    assert!(!repo.revoke_token("nonexistent", "logout", now).await.unwrap());

    let found = repo.find_refresh_token("test_hash").await.unwrap().unwrap();
    assert!(found.is_revoked);
    assert_eq!(found.revoke_reason.as_deref(), Some("logout"));
    assert_eq!(found.revoked_at, Some(now));
}

#[tokio::test]
async fn test_revoke_all_user_tokens() {
    let repo = MockRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();

    for i in 0..3 {
        repo.save_refresh_token(token_for(user_id, &format!("hash_{}", i)))
            .await
            .unwrap();
    }
    repo.save_refresh_token(token_for(other_user_id, "other"))
        .await
        .unwrap();

    let revoked = repo
        .revoke_all_user_tokens(user_id, "logout all", Utc::now())
        .await
        .unwrap();
    assert_eq!(revoked, 3);

    // Tokens saved afterwards stay active
    repo.save_refresh_token(token_for(user_id, "fresh")).await.unwrap();
    let active = repo.find_active_by_user_id(user_id, Utc::now()).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token_hash, "fresh");

    assert_eq!(repo.count_active_tokens(other_user_id, Utc::now()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_expired_tokens() {
    let repo = MockRefreshTokenRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let mut expired = token_for(user_id, "expired");
    expired.expires_at = now - Duration::days(1);
    repo.save_refresh_token(expired).await.unwrap();

    let mut boundary = token_for(user_id, "boundary");
    boundary.expires_at = now;
    repo.save_refresh_token(boundary).await.unwrap();

    repo.save_refresh_token(token_for(user_id, "valid")).await.unwrap();

    let deleted = repo.delete_expired_tokens(now).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(repo.len().await, 1);
    assert!(repo.find_refresh_token("valid").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unavailable_store_returns_internal_error() {
    let repo = MockRefreshTokenRepository::new();
    repo.set_unavailable(true);

    let result = repo.find_refresh_token("hash").await;
    assert!(matches!(result, Err(ref e) if e.is_internal()));
}
