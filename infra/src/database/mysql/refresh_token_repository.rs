//! MySQL implementation of the `RefreshTokenRepository` trait.
//!
//! Rows are keyed by the SHA-256 hex digest of the refresh secret; hashing
//! happens in the core service before any call reaches this layer. UUIDs are
//! stored as `CHAR(36)` strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use dm_core::domain::entities::token::RefreshToken;
use dm_core::errors::DomainError;
use dm_core::repositories::RefreshTokenRepository;

use super::{column_error, query_error};

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, jwt_id, created_at, expires_at, \
     is_used, is_revoked, used_at, revoked_at, revoke_reason, device_info, ip_address";

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
        let user_id: String = row.try_get("user_id").map_err(|e| column_error("user_id", e))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| column_error("token_hash", e))?,
            jwt_id: row.try_get("jwt_id").map_err(|e| column_error("jwt_id", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column_error("expires_at", e))?,
            is_used: row.try_get("is_used").map_err(|e| column_error("is_used", e))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| column_error("is_revoked", e))?,
            used_at: row.try_get("used_at").map_err(|e| column_error("used_at", e))?,
            revoked_at: row
                .try_get("revoked_at")
                .map_err(|e| column_error("revoked_at", e))?,
            revoke_reason: row
                .try_get("revoke_reason")
                .map_err(|e| column_error("revoke_reason", e))?,
            device_info: row
                .try_get("device_info")
                .map_err(|e| column_error("device_info", e))?,
            ip_address: row
                .try_get("ip_address")
                .map_err(|e| column_error("ip_address", e))?,
        })
    }

    fn rows_to_tokens(rows: &[sqlx::mysql::MySqlRow]) -> Result<Vec<RefreshToken>, DomainError> {
        rows.iter().map(Self::row_to_token).collect()
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = format!(
            "INSERT INTO refresh_tokens ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TOKEN_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(&token.jwt_id)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.is_used)
            .bind(token.is_revoked)
            .bind(token.used_at)
            .bind(token.revoked_at)
            .bind(&token.revoke_reason)
            .bind(&token.device_info)
            .bind(&token.ip_address)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(token),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::Validation {
                    message: "Token already exists".to_string(),
                })
            }
            Err(e) => Err(query_error("save refresh token", e)),
        }
    }

    async fn update_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET token_hash = ?, jwt_id = ?, expires_at = ?, is_used = ?, is_revoked = ?,
                used_at = ?, revoked_at = ?, revoke_reason = ?, device_info = ?, ip_address = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&token.token_hash)
            .bind(&token.jwt_id)
            .bind(token.expires_at)
            .bind(token.is_used)
            .bind(token.is_revoked)
            .bind(token.used_at)
            .bind(token.revoked_at)
            .bind(&token.revoke_reason)
            .bind(&token.device_info)
            .bind(&token.ip_address)
            .bind(token.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("update refresh token", e))?;

        if result.rows_affected() == 0 {
            // MySQL reports zero affected rows for an unchanged match too
            let exists = sqlx::query("SELECT 1 FROM refresh_tokens WHERE id = ?")
                .bind(token.id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| query_error("check refresh token existence", e))?;

            if exists.is_none() {
                return Err(DomainError::NotFound {
                    resource: "RefreshToken".to_string(),
                });
            }
        }

        Ok(token)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find refresh token", e))?;

        result.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_jwt_id(&self, jwt_id: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE jwt_id = ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(jwt_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find refresh token by jwt id", e))?;

        result.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_active_by_user_id(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM refresh_tokens
            WHERE user_id = ?
                AND is_revoked = FALSE
                AND is_used = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
            "#,
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("find active user tokens", e))?;

        Self::rows_to_tokens(&rows)
    }

    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("find user tokens", e))?;

        Self::rows_to_tokens(&rows)
    }

    async fn mark_token_used(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        // Single conditional write; concurrent redeemers race on the row lock
        // and only the first sees an affected row.
        let query = r#"
            UPDATE refresh_tokens
            SET is_used = TRUE, used_at = ?
            WHERE token_hash = ?
                AND is_used = FALSE
                AND is_revoked = FALSE
                AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(token_hash)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("mark refresh token used", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn revoke_token(
        &self,
        token_hash: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoke_reason = ?
            WHERE token_hash = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(reason)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("revoke refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: Uuid,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = ?, revoke_reason = ?
            WHERE user_id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(reason)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("revoke user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_active_tokens(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS active
            FROM refresh_tokens
            WHERE user_id = ?
                AND is_revoked = FALSE
                AND is_used = FALSE
                AND expires_at > ?
        "#;

        let row = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("count active tokens", e))?;

        let count: i64 = row.try_get("active").map_err(|e| column_error("active", e))?;
        Ok(count as usize)
    }
}
