//! MySQL implementation of the `UserStore` trait.
//!
//! Accounts live in `users`, role assignments in `user_roles`. Passwords are
//! hashed with bcrypt on the blocking thread pool.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use dm_core::domain::entities::user::{Role, User};
use dm_core::errors::{AuthError, DomainError};
use dm_core::repositories::UserStore;

use super::{column_error, query_error};

/// MySQL implementation of UserStore
pub struct MySqlUserStore {
    /// Database connection pool
    pool: MySqlPool,
    /// bcrypt work factor for new hashes
    cost: u32,
}

impl MySqlUserStore {
    /// Create a new MySQL user store hashing with `bcrypt::DEFAULT_COST`
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_cost(pool, bcrypt::DEFAULT_COST)
    }

    /// Create a store with an explicit bcrypt cost
    pub fn with_cost(pool: MySqlPool, cost: u32) -> Self {
        Self { pool, cost }
    }

    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            })
    }

    async fn verify_password(password: &str, hash: String) -> Result<bool, DomainError> {
        let password = password.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to verify password: {}", e),
            })
    }

    async fn load_roles(&self, user_id: &str) -> Result<BTreeSet<Role>, DomainError> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("load user roles", e))?;

        let mut roles = BTreeSet::new();
        for row in rows {
            let name: String = row.try_get("role").map_err(|e| column_error("role", e))?;
            match name.parse::<Role>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(e) => tracing::warn!(user_id, error = %e, "Skipping unknown role"),
            }
        }

        Ok(roles)
    }

    async fn row_to_user(&self, row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
        let roles = self.load_roles(&id).await?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| column_error("email", e))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| column_error("full_name", e))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| column_error("is_active", e))?,
            roles,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
            last_login_at: row
                .try_get("last_login_at")
                .map_err(|e| column_error("last_login_at", e))?,
        })
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        value: String,
    ) -> Result<Option<sqlx::mysql::MySqlRow>, DomainError> {
        let query = format!(
            "SELECT id, email, full_name, password_hash, is_active, created_at, last_login_at \
             FROM users WHERE {} = ? LIMIT 1",
            column
        );

        sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find user", e))
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        match self.fetch_one_by("id", id.to_string()).await? {
            Some(row) => Ok(Some(self.row_to_user(&row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        match self.fetch_one_by("email", email.to_string()).await? {
            Some(row) => Ok(Some(self.row_to_user(&row).await?)),
            None => Ok(None),
        }
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(row) = self.fetch_one_by("email", email.to_string()).await? else {
            return Ok(None);
        };

        let hash: String = row
            .try_get("password_hash")
            .map_err(|e| column_error("password_hash", e))?;

        if !Self::verify_password(password, hash).await? {
            return Ok(None);
        }

        Ok(Some(self.row_to_user(&row).await?))
    }

    async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        roles: &[Role],
    ) -> Result<User, DomainError> {
        let user = User::new(email, full_name, roles);
        let password_hash = self.hash_password(password).await?;
        let id = user.id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| query_error("begin transaction", e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&password_hash)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AuthError::DuplicateEmail.into());
            }
            Err(e) => return Err(query_error("create user", e)),
        }

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(&id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| query_error("assign user role", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| query_error("commit user creation", e))?;

        tracing::info!(user_id = %user.id, "User account created");
        Ok(user)
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        let Some(row) = self.fetch_one_by("id", user_id.to_string()).await? else {
            return Ok(false);
        };

        let hash: String = row
            .try_get("password_hash")
            .map_err(|e| column_error("password_hash", e))?;

        if !Self::verify_password(current_password, hash).await? {
            return Ok(false);
        }

        let new_hash = self.hash_password(new_password).await?;
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(new_hash)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("update password", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(at)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("record login", e))?;

        Ok(())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS matches FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("check email", e))?;

        let matches: i64 = row.try_get("matches").map_err(|e| column_error("matches", e))?;
        Ok(matches > 0)
    }
}
