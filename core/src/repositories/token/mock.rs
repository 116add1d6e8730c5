//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

/// In-memory refresh token store keyed by token hash
///
/// Every conditional write runs under the single write lock, which gives the
/// same exactly-one-winner behaviour as the SQL store.
pub struct MockRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    unavailable: AtomicBool,
}

impl MockRefreshTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `DomainError::Internal`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Direct mutable access for tests that need to age a record
    pub async fn modify<F>(&self, token_hash: &str, f: F) -> bool
    where
        F: FnOnce(&mut RefreshToken),
    {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token_hash) {
            Some(token) => {
                f(token);
                true
            }
            None => false,
        }
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Token store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(mut tokens: Vec<RefreshToken>) -> Vec<RefreshToken> {
    tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tokens
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn update_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        let Some(key) = tokens
            .iter()
            .find(|(_, t)| t.id == token.id)
            .map(|(k, _)| k.clone())
        else {
            return Err(DomainError::NotFound {
                resource: "RefreshToken".to_string(),
            });
        };

        tokens.remove(&key);
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        self.check_available()?;
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_by_jwt_id(&self, jwt_id: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.check_available()?;
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.jwt_id == jwt_id).cloned())
    }

    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        self.check_available()?;
        let tokens = self.tokens.read().await;
        Ok(newest_first(
            tokens
                .values()
                .filter(|t| t.user_id == user_id && t.is_active_at(now))
                .cloned()
                .collect(),
        ))
    }

    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        self.check_available()?;
        let tokens = self.tokens.read().await;
        Ok(newest_first(
            tokens.values().filter(|t| t.user_id == user_id).cloned().collect(),
        ))
    }

    async fn mark_token_used(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token_hash) {
            Some(token) if token.is_active_at(at) => {
                token.mark_used(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_token(
        &self,
        token_hash: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token_hash) {
            Some(token) if !token.is_revoked => {
                token.revoke(reason, at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.is_revoked {
                token.revoke(reason, at);
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, token| !token.is_expired_at(now));

        Ok(initial_count - tokens.len())
    }
}
