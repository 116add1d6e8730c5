//! Main token service implementation

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::value_objects::{ClientContext, SessionInfo};
use crate::errors::{AuthError, DomainError};
use crate::repositories::RefreshTokenRepository;

use super::config::TokenServiceConfig;
use super::signer::TokenSigner;

/// Number of random bytes in a refresh secret
pub const REFRESH_SECRET_BYTES: usize = 64;

/// Issues access tokens and manages the refresh token lifecycle
///
/// A refresh token moves from `Active` to exactly one of `Used`, `Revoked` or
/// `Expired` and never leaves that state.
pub struct JwtService<R: RefreshTokenRepository> {
    repository: Arc<R>,
    signer: TokenSigner,
    config: TokenServiceConfig,
}

impl<R: RefreshTokenRepository> JwtService<R> {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// An error if the signing key configuration is rejected
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        let signer = TokenSigner::new(&config)?;
        Ok(Self {
            repository,
            signer,
            config,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a signed access token for a user
    pub fn issue_access_token(&self, user: &User) -> Result<AccessToken, DomainError> {
        self.signer.issue(user)
    }

    /// Generates and persists a refresh token bound to `jwt_id`
    ///
    /// # Returns
    ///
    /// The raw secret. Only its hash is stored.
    pub async fn issue_refresh_token(
        &self,
        user: &User,
        jwt_id: &str,
        client: &ClientContext,
    ) -> Result<String, DomainError> {
        let secret = generate_secret();
        let record = RefreshToken::new(
            user.id,
            hash_token(&secret),
            jwt_id,
            self.config.refresh_token_ttl(),
            &client.sanitized(),
        );

        self.repository.save_refresh_token(record).await?;
        Ok(secret)
    }

    /// Issues an access token and a refresh token sharing one `jti`
    ///
    /// Inactive users are refused with `AccountDisabled`.
    pub async fn issue_token_pair(
        &self,
        user: &User,
        client: &ClientContext,
    ) -> Result<TokenPair, DomainError> {
        if !user.is_active {
            return Err(AuthError::AccountDisabled.into());
        }

        let access = self.issue_access_token(user)?;
        let refresh_token = self
            .issue_refresh_token(user, access.jwt_id(), client)
            .await?;

        Ok(TokenPair {
            jwt_id: access.claims.jti.clone(),
            access_token: access.token,
            refresh_token,
            access_expires_in: self.signer.access_ttl_seconds(),
            refresh_expires_in: self.config.refresh_token_ttl().num_seconds(),
        })
    }

    /// Checks that a refresh secret exists, is paired with `expected_jwt_id`
    /// and is still active
    ///
    /// Every failing condition yields the same `false`.
    pub async fn validate_refresh_token(
        &self,
        secret: &str,
        expected_jwt_id: &str,
    ) -> Result<bool, DomainError> {
        let Some(token) = self.repository.find_refresh_token(&hash_token(secret)).await? else {
            debug!("Refresh token not found");
            return Ok(false);
        };

        if token.jwt_id != expected_jwt_id {
            debug!(token_id = %token.id, "Refresh token paired with a different access token");
            return Ok(false);
        }

        let now = Utc::now();
        if token.is_used && !token.is_revoked && !token.is_expired_at(now) {
            warn!(
                token_id = %token.id,
                user_id = %token.user_id,
                "Redemption attempt on an already used refresh token"
            );
        }

        Ok(token.is_active_at(now))
    }

    /// Redeems a refresh secret
    ///
    /// # Returns
    ///
    /// `true` only for the single caller that performed `Active -> Used`
    pub async fn mark_used(&self, secret: &str) -> Result<bool, DomainError> {
        self.repository
            .mark_token_used(&hash_token(secret), Utc::now())
            .await
    }

    /// Looks up the record behind a refresh secret
    pub async fn find_refresh_token(&self, secret: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.repository.find_refresh_token(&hash_token(secret)).await
    }

    /// Revokes a single refresh token
    pub async fn revoke_refresh_token(&self, secret: &str, reason: &str) -> Result<bool, DomainError> {
        let revoked = self
            .repository
            .revoke_token(&hash_token(secret), reason, Utc::now())
            .await?;
        if revoked {
            debug!(reason, "Refresh token revoked");
        }
        Ok(revoked)
    }

    /// Revokes every outstanding refresh token of a user
    pub async fn revoke_all_for_user(&self, user_id: Uuid, reason: &str) -> Result<usize, DomainError> {
        let count = self
            .repository
            .revoke_all_user_tokens(user_id, reason, Utc::now())
            .await?;
        info!(%user_id, count, reason, "Revoked refresh tokens");
        Ok(count)
    }

    /// Removes expired tokens from storage
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired_tokens(Utc::now()).await
    }

    /// Number of active refresh tokens of a user
    pub async fn count_active(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.repository.count_active_tokens(user_id, Utc::now()).await
    }

    /// Active sessions of a user, newest first
    pub async fn active_sessions(&self, user_id: Uuid) -> Result<Vec<SessionInfo>, DomainError> {
        let tokens = self
            .repository
            .find_active_by_user_id(user_id, Utc::now())
            .await?;
        Ok(tokens.iter().map(SessionInfo::from).collect())
    }

    /// Reads claims from an access token that may have expired
    pub fn validate_expired_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.validate_expired(token)
    }

    /// Verifies an access token including expiry
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.verify(token)
    }
}

/// SHA-256 hex digest of a refresh secret, as stored
pub fn hash_token(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_secret() -> String {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
