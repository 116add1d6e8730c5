//! Refresh token repository trait defining the persistence contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations
///
/// Records are keyed by the SHA-256 hex digest of the refresh secret; callers
/// hash before every lookup. Implementations hold no business rules beyond the
/// conditional writes documented on [`mark_token_used`](Self::mark_token_used)
/// and [`revoke_all_user_tokens`](Self::revoke_all_user_tokens).
///
/// # Example
/// ```no_run
/// # use chrono::Utc;
/// # use dm_core::repositories::RefreshTokenRepository;
/// # async fn example(repo: &impl RefreshTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
/// let hash = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
///
/// if repo.mark_token_used(hash, Utc::now()).await? {
///     println!("redeemed");
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Overwrite an existing record, matched by `id`
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No record with that id
    async fn update_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hashed value
    async fn find_refresh_token(&self, token_hash: &str)
        -> Result<Option<RefreshToken>, DomainError>;

    /// Find the refresh token bound to an access token `jti`
    async fn find_by_jwt_id(&self, jwt_id: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Active (not used, not revoked, unexpired at `now`) tokens of a user,
    /// newest first
    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError>;

    /// Every token of a user regardless of state, newest first
    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Atomically redeem a token
    ///
    /// Performs the `Active -> Used` transition as one conditional write: the
    /// record must exist, be unused, unrevoked and unexpired at `at`.
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - The token was missing or no longer active
    async fn mark_token_used(&self, token_hash: &str, at: DateTime<Utc>)
        -> Result<bool, DomainError>;

    /// Revoke a specific refresh token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked by this call
    /// * `Ok(false)` - Token not found or already revoked
    async fn revoke_token(
        &self,
        token_hash: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Revoke every non-revoked token of a user in one set-based write
    ///
    /// Tokens saved after the write completes are unaffected.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    async fn revoke_all_user_tokens(
        &self,
        user_id: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Delete tokens whose `expires_at` is at or before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired tokens deleted
    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Count active tokens for a user
    async fn count_active_tokens(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let tokens = self.find_active_by_user_id(user_id, now).await?;
        Ok(tokens.len())
    }
}
